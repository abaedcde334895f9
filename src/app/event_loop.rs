use std::io::stdout;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use super::effects::FetchCompletion;
use crate::app::{App, Message, Model, update};

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: mosaic requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);
        crate::perf::log_event(
            "init.layout",
            format!(
                "terminal={}x{} breakpoint={}",
                size.width,
                size.height,
                self.trigger.breakpoint()
            ),
        );

        let mut model = self.initial_model((size.width, size.height));
        let result = self.event_loop(&mut terminal, &mut model);

        // Restore terminal
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn dispatch(&self, model: &mut Model, msg: Message, frame_idx: u64) {
        crate::perf::log_event("event.message", format!("frame={frame_idx} msg={msg:?}"));
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, &side_msg);
    }

    /// Feed trigger signals into the model. Returns whether anything changed.
    fn apply_trigger_signals(&self, model: &mut Model, frame_idx: u64) -> bool {
        let mut changed = false;
        // Re-observe after each dispatch: a relayout invalidates earlier signals.
        while let Some(msg) = model.next_trigger() {
            let relayout = matches!(msg, Message::WidthClassChanged(_));
            let was_loading = model.session.is_loading();
            self.dispatch(model, msg, frame_idx);
            changed |= relayout || was_loading != model.session.is_loading();
            if !relayout {
                break;
            }
        }
        changed
    }

    fn drain_completions(
        &self,
        model: &mut Model,
        completions: &Receiver<FetchCompletion>,
        frame_idx: u64,
    ) -> bool {
        let mut received = false;
        while let Ok(done) = completions.try_recv() {
            crate::perf::log_event(
                "fetch.complete",
                format!(
                    "frame={frame_idx} page={} ok={}",
                    done.ticket.page(),
                    done.result.is_ok()
                ),
            );
            self.dispatch(model, Message::PageLoaded(done.ticket, done.result), frame_idx);
            received = true;
        }
        received
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let (fetch_tx, fetch_rx): (Sender<FetchCompletion>, Receiver<FetchCompletion>) =
            mpsc::channel();
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;
        let mut check_triggers = true;

        execute!(stdout(), EnableMouseCapture)?;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                self.dispatch(model, Message::Resize(width, height), frame_idx);
                needs_render = true;
                check_triggers = true;
            }

            if self.drain_completions(model, &fetch_rx, frame_idx) {
                needs_render = true;
                check_triggers = true;
            }

            // A backoff that has run out needs a fresh look at the sentinel.
            if model.session.expire_backoff(Instant::now()) {
                check_triggers = true;
                needs_render = true;
            }

            if check_triggers {
                if self.apply_trigger_signals(model, frame_idx) {
                    needs_render = true;
                }
                check_triggers = false;
            }

            self.spawn_pending_fetch(model, &fetch_tx);
            model.set_resize_pending(resize_debouncer.is_pending());

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else if model.session.is_loading() || model.session.retry_at().is_some() {
                25
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    self.handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    self.dispatch(model, msg, frame_idx);
                    needs_render = true;
                    check_triggers = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        self.handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        drained += 1;
                        self.dispatch(model, msg, frame_idx);
                        needs_render = true;
                        check_triggers = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} viewport={}..{} items={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.viewport.offset(),
                        model.viewport.offset() + model.viewport.height() as usize,
                        model.layout().item_count()
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_debouncer_waits_for_quiet_period() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(100, 30, 0);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(50), None);

        debouncer.queue(130, 40, 60);
        assert_eq!(debouncer.take_ready(120), None);
        assert_eq!(debouncer.take_ready(160), Some((130, 40)));
        assert!(!debouncer.is_pending());
    }
}
