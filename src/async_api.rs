use crate::export::ExportRequest;
use crate::model::{CommentModel, Field, ImageData, PostModel};
use crate::rendering::node::VisualTree;
use crate::rendering::raster::Rasterizer;
use crate::{Editor, Error, ExportedImage, Exporter, ImageSlot, ImageTicket, Result, SessionConfig, TemplateEntry};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

enum Command {
    SetField(Field, String, oneshot::Sender<()>),
    SelectTemplate(String, oneshot::Sender<Result<()>>),
    SetTheme(String, oneshot::Sender<Result<()>>),
    SetFont(String, oneshot::Sender<Result<()>>),
    SetPlatform(String, oneshot::Sender<Option<&'static TemplateEntry>>),
    Randomize(oneshot::Sender<()>),

    // Images
    BeginImageLoad(ImageSlot, oneshot::Sender<ImageTicket>),
    FinishImageLoad(ImageTicket, Result<ImageData>, oneshot::Sender<Result<bool>>),
    ClearImage(ImageSlot, oneshot::Sender<()>),

    // Reads
    Preview(oneshot::Sender<Option<VisualTree>>),
    Models(oneshot::Sender<(PostModel, CommentModel)>),
    ExportRequest(oneshot::Sender<Result<ExportRequest>>),

    Close(oneshot::Sender<()>),
}

/// An async-friendly editing session backed by a dedicated worker thread.
///
/// The worker owns the [`Editor`] and applies commands in arrival order, so
/// every mutation happens on one thread. Image decoding and export
/// rasterization run on tokio's blocking pool and hand their results back
/// through the worker.
#[derive(Clone)]
pub struct Studio {
    cmd_tx: Sender<Command>,
    exporter: Exporter,
}

impl Studio {
    /// Start a session (spawns the worker thread that owns the editor).
    pub async fn new(config: SessionConfig, platform_id: &str) -> Result<Self> {
        let exporter = Exporter::new(&config);
        Self::start(config, platform_id, exporter).await
    }

    /// Start a session that exports through a custom rasterizer
    pub async fn with_rasterizer(config: SessionConfig, platform_id: &str, rasterizer: Arc<dyn Rasterizer>) -> Result<Self> {
        let exporter = Exporter::with_rasterizer(&config, rasterizer);
        Self::start(config, platform_id, exporter).await
    }

    async fn start(config: SessionConfig, platform_id: &str, exporter: Exporter) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();
        let platform_id = platform_id.to_string();

        thread::spawn(move || {
            let mut editor = match Editor::new(config, &platform_id) {
                Ok(e) => e,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::SetField(field, value, resp) => {
                        editor.set_field(field, &value);
                        let _ = resp.send(());
                    }
                    Command::SelectTemplate(id, resp) => {
                        let _ = resp.send(editor.select_template(&id));
                    }
                    Command::SetTheme(name, resp) => {
                        let _ = resp.send(editor.set_theme(&name));
                    }
                    Command::SetFont(name, resp) => {
                        let _ = resp.send(editor.set_font(&name));
                    }
                    Command::SetPlatform(id, resp) => {
                        editor.set_platform(&id);
                        let _ = resp.send(editor.template());
                    }
                    Command::Randomize(resp) => {
                        editor.randomize_engagement();
                        let _ = resp.send(());
                    }
                    Command::BeginImageLoad(slot, resp) => {
                        let _ = resp.send(editor.begin_image_load(slot));
                    }
                    Command::FinishImageLoad(ticket, decoded, resp) => {
                        let _ = resp.send(editor.finish_image_load(ticket, decoded));
                    }
                    Command::ClearImage(slot, resp) => {
                        editor.clear_image(slot);
                        let _ = resp.send(());
                    }
                    Command::Preview(resp) => {
                        let _ = resp.send(editor.preview());
                    }
                    Command::Models(resp) => {
                        let _ = resp.send((editor.post().clone(), editor.comment().clone()));
                    }
                    Command::ExportRequest(resp) => {
                        let _ = resp.send(editor.export_request());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx, exporter })
    }

    async fn call<T>(&self, what: &str, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .map_err(|_| Error::Other(format!("{} failed: session closed", what)))?;
        rx.await.map_err(|e| Error::Other(format!("{} canceled: {}", what, e)))
    }

    pub async fn set_field(&self, field: Field, value: &str) -> Result<()> {
        let value = value.to_string();
        self.call("SetField", |tx| Command::SetField(field, value, tx)).await
    }

    pub async fn select_template(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.call("SelectTemplate", |tx| Command::SelectTemplate(id, tx)).await?
    }

    pub async fn set_theme(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.call("SetTheme", |tx| Command::SetTheme(name, tx)).await?
    }

    pub async fn set_font(&self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.call("SetFont", |tx| Command::SetFont(name, tx)).await?
    }

    /// Switch platform; returns the template that became active
    pub async fn set_platform(&self, id: &str) -> Result<Option<&'static TemplateEntry>> {
        let id = id.to_string();
        self.call("SetPlatform", |tx| Command::SetPlatform(id, tx)).await
    }

    pub async fn randomize_engagement(&self) -> Result<()> {
        self.call("Randomize", Command::Randomize).await
    }

    pub async fn begin_image_load(&self, slot: ImageSlot) -> Result<ImageTicket> {
        self.call("BeginImageLoad", |tx| Command::BeginImageLoad(slot, tx)).await
    }

    pub async fn finish_image_load(&self, ticket: ImageTicket, decoded: Result<ImageData>) -> Result<bool> {
        self.call("FinishImageLoad", |tx| Command::FinishImageLoad(ticket, decoded, tx)).await?
    }

    /// Decode `bytes` off the worker and store the result in `slot`.
    ///
    /// Returns `Ok(false)` when a newer upload to the same slot started while
    /// this one was decoding; the newer one wins.
    pub async fn upload_image(&self, slot: ImageSlot, bytes: Vec<u8>) -> Result<bool> {
        let ticket = self.begin_image_load(slot).await?;
        let decoded = tokio::task::spawn_blocking(move || ImageData::decode(&bytes))
            .await
            .map_err(|e| Error::Other(format!("Image decode task failed: {}", e)))?;
        self.finish_image_load(ticket, decoded).await
    }

    pub async fn clear_image(&self, slot: ImageSlot) -> Result<()> {
        self.call("ClearImage", |tx| Command::ClearImage(slot, tx)).await
    }

    pub async fn preview(&self) -> Result<Option<VisualTree>> {
        self.call("Preview", Command::Preview).await
    }

    /// Copies of the current post and comment
    pub async fn models(&self) -> Result<(PostModel, CommentModel)> {
        self.call("Models", Command::Models).await
    }

    pub fn is_exporting(&self) -> bool {
        self.exporter.is_busy()
    }

    /// Snapshot the current preview on the blocking pool.
    ///
    /// Fails with [`Error::ExportInProgress`] while another export from this
    /// session is still running. The session stays editable either way.
    pub async fn export(&self) -> Result<ExportedImage> {
        let guard = self.exporter.begin()?;
        let request = self.call("ExportRequest", Command::ExportRequest).await??;
        let exporter = self.exporter.clone();
        tokio::task::spawn_blocking(move || {
            let res = exporter.render(&request);
            drop(guard);
            res
        })
        .await
        .map_err(|e| Error::ExportError(format!("Export task failed: {}", e)))?
    }

    /// Shut down the worker thread
    pub async fn close(self) -> Result<()> {
        self.call("Close", Command::Close).await
    }
}
