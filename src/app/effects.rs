use std::io::{Write, stdout};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use base64::Engine;

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::gallery::PageTicket;
use crate::source::{FetchError, PageResult};

/// A finished fetch on its way back to the event loop.
#[derive(Debug)]
pub(super) struct FetchCompletion {
    pub(super) ticket: PageTicket,
    pub(super) result: Result<PageResult, FetchError>,
}

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenSelected => Self::open_selected(model),
            Message::CopySelected => Self::copy_selected(model),
            _ => {}
        }
    }

    /// Run the model's pending fetch, if any, on a worker thread.
    pub(super) fn spawn_pending_fetch(
        &self,
        model: &mut Model,
        completions: &Sender<FetchCompletion>,
    ) {
        let Some(ticket) = model.take_pending_fetch() else {
            return;
        };
        crate::perf::log_event(
            "fetch.spawn",
            format!(
                "query={:?} page={} per_page={}",
                ticket.request().query,
                ticket.page(),
                ticket.request().per_page
            ),
        );
        let source = Arc::clone(&self.source);
        let tx = completions.clone();
        let worker_ticket = ticket.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("mosaic-fetch-{}", ticket.page()))
            .spawn(move || {
                let _scope = crate::perf::scope("fetch.page");
                let result = source.fetch_page(worker_ticket.request());
                // The receiver is gone only when the app is shutting down.
                let _ = tx.send(FetchCompletion {
                    ticket: worker_ticket,
                    result,
                });
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to start fetch worker");
            let failure = Err(FetchError::Transient(format!(
                "could not start fetch worker: {err}"
            )));
            *model = update(std::mem::take(model), Message::PageLoaded(ticket, failure));
        }
    }

    fn open_selected(model: &mut Model) {
        let Some(item) = model.selected_item() else {
            model.show_toast(ToastLevel::Info, "No image selected");
            return;
        };
        let url = item.page_url().unwrap_or_else(|| item.url()).to_string();
        match open_external_link(&url) {
            Ok(()) => model.show_toast(ToastLevel::Info, format!("Opened {url}")),
            Err(err) => model.show_toast(ToastLevel::Error, format!("Open failed: {err}")),
        }
    }

    fn copy_selected(model: &mut Model) {
        let Some(item) = model.selected_item() else {
            model.show_toast(ToastLevel::Info, "No image selected");
            return;
        };
        let url = item.url().to_string();
        match copy_to_clipboard(&url) {
            Ok(()) => model.show_toast(ToastLevel::Info, "Copied image URL"),
            Err(err) => model.show_toast(ToastLevel::Error, format!("Copy failed: {err}")),
        }
    }
}

fn open_external_link(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()?
            .wait()?;
        Ok(())
    }
    #[cfg(target_os = "windows")]
    {
        use std::process::Stdio;
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        return Ok(());
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        use std::process::Stdio;
        std::process::Command::new("xdg-open")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?
            .wait()?;
        Ok(())
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    let mut out = stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::source::MemorySource;
    use crate::source::memory::sample_items;

    #[test]
    fn test_osc52_sequence_encodes_url() {
        let seq = osc52_sequence("https://a.b");
        assert_eq!(seq, "\x1b]52;c;aHR0cHM6Ly9hLmI=\x07");
    }

    #[test]
    fn test_spawned_fetch_reports_back_over_channel() {
        let source = Arc::new(MemorySource::new().with_page(sample_items(1, 3)));
        let app = App::new(source.clone()).with_query("mining").with_per_page(3);
        let mut model = app.initial_model((80, 24));
        model = update(model, Message::LoadMoreVisible);

        let (tx, rx) = mpsc::channel();
        app.spawn_pending_fetch(&mut model, &tx);
        assert!(model.pending_fetch().is_none());

        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(done.ticket.page(), 1);
        assert_eq!(done.result.as_ref().unwrap().items.len(), 3);
        assert_eq!(source.request_count(), 1);
    }

    #[test]
    fn test_spawn_without_ticket_does_nothing() {
        let source = Arc::new(MemorySource::new());
        let app = App::new(source.clone());
        let mut model = app.initial_model((80, 24));
        let (tx, rx) = mpsc::channel();
        app.spawn_pending_fetch(&mut model, &tx);
        assert!(rx.try_recv().is_err());
        assert_eq!(source.request_count(), 0);
    }
}
