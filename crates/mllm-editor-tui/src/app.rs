use std::path::PathBuf;
use tokio::task::JoinHandle;
use mllm_editor_core::{
    data_url_from_file, BackendClient, ChatReply, Config, Fragment, SendError, Session,
    Transport, TransportError, Url,
};
use crate::editor::Editor;

pub const STATUS_EMPTY: &str = "Please add text or an image before sending.";
pub const STATUS_SENDING: &str = "Sending to model…";
pub const STATUS_FAILED: &str = "Failed to reach backend. Is it running?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Editing,
    ImagePath,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Compose pane
    pub editor: Editor,
    pub editor_scroll: u16,
    pub image_path_input: String,

    // Conversation
    pub session: Session,
    pub status: String,
    pub send_task: Option<JoinHandle<Result<ChatReply, TransportError>>>,
    pub transcript_scroll: u16,
    pub transcript_height: u16,
    pub transcript_width: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub backend: BackendClient,
    pub image_base: Option<Url>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            editor: Editor::new(),
            editor_scroll: 0,
            image_path_input: String::new(),

            session: Session::new(),
            status: String::new(),
            send_task: None,
            transcript_scroll: 0,
            transcript_height: 0,
            transcript_width: 0,

            animation_frame: 0,

            backend: BackendClient::new(&config.backend_url),
            image_base: config.image_base(),
        }
    }

    /// Snapshot of the compose pane as a parsed document
    pub fn capture_document(&self) -> Fragment {
        let fragment = Fragment::parse(&self.editor.to_html());
        match &self.image_base {
            Some(base) => fragment.with_base(base.clone()),
            None => fragment,
        }
    }

    pub fn send(&mut self) {
        let document = self.capture_document();
        match self.session.begin_send(&document) {
            Ok(request) => {
                let backend = self.backend.clone();
                self.send_task = Some(tokio::spawn(async move { backend.send(request).await }));
                self.status = STATUS_SENDING.to_string();
                self.scroll_transcript_to_bottom();
            }
            Err(SendError::EmptyContent) => {
                self.status = STATUS_EMPTY.to_string();
            }
            // The send key is inert while a request is in flight
            Err(SendError::AlreadySending) => {}
            Err(e) => {
                self.status = e.to_string();
            }
        }
    }

    /// Hand a finished request back to the session
    pub async fn poll_send_task(&mut self) {
        if !self.send_task.as_ref().is_some_and(|task| task.is_finished()) {
            return;
        }
        let Some(task) = self.send_task.take() else {
            return;
        };

        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(TransportError::Task(e.to_string())),
        };

        match self.session.finish_send(result) {
            Ok(_) => self.status.clear(),
            Err(e) => {
                tracing::error!("send failed: {e}");
                self.status = STATUS_FAILED.to_string();
            }
        }
        self.scroll_transcript_to_bottom();
    }

    pub fn begin_image_prompt(&mut self) {
        self.image_path_input.clear();
        self.input_mode = InputMode::ImagePath;
    }

    pub fn cancel_image_prompt(&mut self) {
        self.image_path_input.clear();
        self.input_mode = InputMode::Editing;
    }

    /// Embed the file named in the image prompt at the caret
    pub fn insert_image_from_prompt(&mut self) {
        let path = expand_home(self.image_path_input.trim());
        self.cancel_image_prompt();

        match data_url_from_file(&path) {
            Ok(url) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                self.editor.insert_image(&name, &url);
                self.status.clear();
            }
            Err(e) => {
                tracing::warn!("image insert failed: {e}");
                self.status = e.to_string();
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if self.session.is_sending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_transcript_up(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    pub fn scroll_transcript_down(&mut self, lines: u16) {
        let max = self.transcript_lines().saturating_sub(self.transcript_height);
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines).min(max);
    }

    /// Scroll so the newest entry (or "Thinking...") is visible
    pub fn scroll_transcript_to_bottom(&mut self) {
        self.transcript_scroll = self.transcript_lines().saturating_sub(self.transcript_height);
    }

    /// Rendered height of the transcript at the current width
    fn transcript_lines(&self) -> u16 {
        // Default to 50 columns before the first render
        let wrap_width = if self.transcript_width > 0 {
            self.transcript_width as usize
        } else {
            50
        };

        let mut total: usize = 0;
        for msg in self.session.transcript().messages() {
            total += 1; // role line
            for line in msg.content.lines() {
                let chars = line.chars().count();
                total += chars.div_ceil(wrap_width).max(1);
            }
            total += 1; // spacer
        }
        if self.session.is_sending() {
            total += 2;
        }
        total.min(u16::MAX as usize) as u16
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw)),
        None => PathBuf::from(raw),
    }
}
