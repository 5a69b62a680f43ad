use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use reqwest::Client;
use std::process::Stdio;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::catalog::VideoItem;
use crate::links::LinkTemplates;
use crate::modal::LoadSignal;

/// What the embedded player reports once its content has loaded.
#[derive(Debug)]
pub struct PlayerEvent {
  pub signal: LoadSignal,
  /// Preview frame, if the hosting provider served one.
  pub preview: Option<DynamicImage>,
}

/// Stand-in for the embedded third-party player shown inside the modal.
///
/// Mounting an item starts a background load of its preview; when that load
/// finishes (successfully or not) exactly one `PlayerEvent` tagged with the
/// item id is queued. Signals from earlier mounts may still be queued when a
/// new item is mounted, so consumers must check the tag.
pub struct EmbeddedPlayer {
  http_client: Client,
  templates: LinkTemplates,
  fetch_previews: bool,
  event_tx: mpsc::UnboundedSender<PlayerEvent>,
  event_rx: mpsc::UnboundedReceiver<PlayerEvent>,
  load_handle: Option<JoinHandle<()>>,
  /// Embed URL of the mounted item.
  pub embed_url: Option<String>,
  /// Preview of the mounted item once its load signal was accepted.
  pub preview: Option<(u32, DynamicImage)>,
}

impl EmbeddedPlayer {
  pub fn new(templates: LinkTemplates, fetch_previews: bool) -> Self {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    Self {
      http_client: Client::new(),
      templates,
      fetch_previews,
      event_tx,
      event_rx,
      load_handle: None,
      embed_url: None,
      preview: None,
    }
  }

  pub fn is_mounted(&self) -> bool {
    self.embed_url.is_some()
  }

  /// Mount `item`, tearing down whatever was mounted before. The load task
  /// sends `signal` back once it finishes. Must run inside a tokio runtime.
  pub fn mount(&mut self, item: &VideoItem, signal: LoadSignal) {
    self.teardown();

    let item_id = item.id;
    let embed_url = item.embed_link(&self.templates);
    let thumbnail_url = item.thumbnail(&self.templates);
    info!(id = item_id, url = %embed_url, "player: mount");
    self.embed_url = Some(embed_url);

    let client = self.http_client.clone();
    let tx = self.event_tx.clone();
    let fetch = self.fetch_previews;
    self.load_handle = Some(tokio::spawn(async move {
      let preview = if fetch {
        match fetch_preview(&client, &thumbnail_url).await {
          Ok(image) => Some(image),
          Err(e) => {
            let err = format!("{:#}", e);
            warn!(id = item_id, err = %err, "player: preview unavailable");
            None
          }
        }
      } else {
        None
      };
      let _ = tx.send(PlayerEvent { signal, preview });
    }));
  }

  /// Drop the mounted content. In-flight loads are aborted; nothing is sent to the provider.
  pub fn teardown(&mut self) {
    if let Some(handle) = self.load_handle.take() {
      handle.abort();
    }
    if let Some(url) = self.embed_url.take() {
      debug!(url = %url, "player: teardown");
    }
    self.preview = None;
  }

  /// Next queued load event, if any. Never blocks.
  pub fn try_next_event(&mut self) -> Option<PlayerEvent> {
    self.event_rx.try_recv().ok()
  }

  /// Keep the preview carried by an accepted event.
  pub fn accept(&mut self, event: PlayerEvent) {
    if let Some(image) = event.preview {
      self.preview = Some((event.signal.item_id, image));
    }
  }
}

impl Drop for EmbeddedPlayer {
  fn drop(&mut self) {
    if let Some(handle) = self.load_handle.take() {
      handle.abort();
    }
  }
}

/// Download and decode a preview image.
pub async fn fetch_preview(client: &Client, url: &str) -> Result<DynamicImage> {
  let response = client.get(url).send().await.with_context(|| format!("Failed to request preview {}", url))?;
  if !response.status().is_success() {
    return Err(anyhow!("Preview request returned {} for {}", response.status(), url));
  }
  let bytes = response.bytes().await.with_context(|| format!("Failed to read preview bytes from {}", url))?;
  image::load_from_memory(&bytes).with_context(|| format!("Failed to decode preview (URL: {})", url))
}

/// Open `url` in the system browser without waiting for it.
pub fn open_in_browser(url: &str) -> Result<()> {
  #[cfg(target_os = "macos")]
  let cmd = "open";
  #[cfg(not(target_os = "macos"))]
  let cmd = "xdg-open";

  let mut child = std::process::Command::new(cmd)
    .arg(url)
    .stdin(Stdio::null())
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .spawn()
    .with_context(|| format!("Failed to launch {}", cmd))?;
  // Reap the child in a background thread to avoid zombie processes.
  std::thread::spawn(move || {
    let _ = child.wait();
  });
  info!(url = %url, "player: opened in browser");
  Ok(())
}
