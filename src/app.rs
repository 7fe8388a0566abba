use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use tokio::task::{JoinError, JoinHandle};
use tracing::warn;

use crate::api::{ApiClient, HistoryEntry};
use crate::chat::ChatController;
use crate::history;
use crate::transcript::MessageStore;
use crate::upload::UploadController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// What the input line currently feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Chat,
    UploadPath,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub prompt: Prompt,
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Domain state
    pub store: MessageStore,
    pub chat: ChatController,
    pub upload: UploadController,
    pub api: ApiClient,

    // In-flight request continuations, polled on Tick
    chat_task: Option<JoinHandle<Result<String>>>,
    upload_task: Option<JoinHandle<Result<String>>>,
    history_task: Option<JoinHandle<Result<Vec<HistoryEntry>>>>,
    clear_task: Option<JoinHandle<Result<()>>>,

    // Popup state
    pub show_clear_confirm: bool,
    pub notice: Option<String>,

    // Transcript viewport (updated during render)
    pub transcript_scroll: u16,
    pub transcript_height: u16,
    pub transcript_width: u16,

    // Animation state: 0-2 for the thinking ellipsis
    pub animation_frame: u8,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            prompt: Prompt::Chat,
            input: String::new(),
            cursor: 0,

            store: MessageStore::new(),
            chat: ChatController::new(),
            upload: UploadController::new(),
            api,

            chat_task: None,
            upload_task: None,
            history_task: None,
            clear_task: None,

            show_clear_confirm: false,
            notice: None,

            transcript_scroll: 0,
            transcript_height: 0,
            transcript_width: 0,

            animation_frame: 0,
        }
    }

    /// Hydrate the transcript from persisted history. Fired once at startup;
    /// a failure is logged only, since an empty transcript is a valid
    /// initial state.
    pub fn load_history(&mut self) {
        let api = self.api.clone();
        self.history_task = Some(tokio::spawn(async move { api.fetch_history().await }));
    }

    /// Route the entry line to whichever workflow owns it.
    pub fn submit_input(&mut self) {
        match self.prompt {
            Prompt::Chat => self.send_chat_message(),
            Prompt::UploadPath => self.start_upload(),
        }
    }

    /// Optimistically insert the user message and placeholder, then issue
    /// the single chat request. Blank input or an in-flight request leaves
    /// everything untouched.
    fn send_chat_message(&mut self) {
        let Some(payload) = self.chat.begin_send(&mut self.store, &self.input) else {
            return;
        };

        self.input.clear();
        self.cursor = 0;
        self.scroll_transcript_to_bottom();

        let api = self.api.clone();
        self.chat_task = Some(tokio::spawn(
            async move { api.send_chat(&payload).await },
        ));
    }

    /// Validate the typed path locally; only an accepted file issues the
    /// upload request. The file is read inside the request task so a read
    /// failure surfaces through the same error banner.
    fn start_upload(&mut self) {
        let path = PathBuf::from(self.input.trim());
        let filename = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => return,
        };

        self.input.clear();
        self.cursor = 0;
        self.prompt = Prompt::Chat;

        if !self.upload.begin_upload(&filename) {
            return;
        }

        let api = self.api.clone();
        self.upload_task = Some(tokio::spawn(async move {
            let content = tokio::fs::read(&path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?;
            api.upload_document(&filename, content).await
        }));
    }

    pub fn request_clear_history(&mut self) {
        if self.clear_task.is_none() {
            self.show_clear_confirm = true;
        }
    }

    pub fn cancel_clear_history(&mut self) {
        self.show_clear_confirm = false;
    }

    /// User confirmed: issue the delete. The store is only touched by the
    /// continuation, once the server acknowledges.
    pub fn confirm_clear_history(&mut self) {
        self.show_clear_confirm = false;
        let api = self.api.clone();
        self.clear_task = Some(tokio::spawn(async move { api.clear_history().await }));
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Reconcile any finished background request. Each continuation runs
    /// here, on the event-loop thread, so store mutations never race.
    pub async fn poll_tasks(&mut self) {
        if let Some(task) = self.chat_task.take_if(|t| t.is_finished()) {
            let result = flatten_join(task.await);
            self.chat.finish_send(&mut self.store, result);
            // Success or failure: the entry field gets focus back.
            self.input_mode = InputMode::Editing;
            self.scroll_transcript_to_bottom();
        }

        if let Some(task) = self.upload_task.take_if(|t| t.is_finished()) {
            self.upload.finish_upload(flatten_join(task.await));
        }

        if let Some(task) = self.history_task.take_if(|t| t.is_finished()) {
            match flatten_join(task.await) {
                Ok(entries) => {
                    history::apply_history(&mut self.store, &entries);
                    self.scroll_transcript_to_bottom();
                }
                Err(err) => warn!(error = %err, "failed to load chat history"),
            }
        }

        if let Some(task) = self.clear_task.take_if(|t| t.is_finished()) {
            match flatten_join(task.await) {
                Ok(()) => {
                    history::apply_cleared(&mut self.store);
                    self.transcript_scroll = 0;
                }
                Err(err) => self.notice = Some(format!("Failed to clear history: {err}")),
            }
        }
    }

    /// Timer tick: advance the thinking animation and expire the upload
    /// status banner.
    pub fn tick(&mut self) {
        if self.chat.busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.upload.tick(Instant::now());
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self
            .transcript_line_count()
            .saturating_sub(self.transcript_height);
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_to_top(&mut self) {
        self.transcript_scroll = 0;
    }

    /// Scroll so the newest message (or the thinking placeholder) is visible.
    pub fn scroll_transcript_to_bottom(&mut self) {
        let total_lines = self.transcript_line_count();
        let visible_height = if self.transcript_height > 0 {
            self.transcript_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.transcript_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.transcript_scroll = 0;
        }
    }

    // Wrapped line count of the rendered transcript, mirroring the layout
    // produced by ui::transcript_lines.
    fn transcript_line_count(&self) -> u16 {
        let wrap_width = if self.transcript_width > 0 {
            self.transcript_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in self.store.list() {
            total_lines += 1; // Role line ("You:" or "Bot:")
            for line in msg.content.lines() {
                // Character count, not byte length, for UTF-8 content
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        total_lines
    }

    /// True while the send control is held disabled by an in-flight chat
    /// request.
    pub fn send_disabled(&self) -> bool {
        self.chat.busy()
    }
}

fn flatten_join<T>(result: Result<Result<T>, JoinError>) -> Result<T> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(anyhow!("background task failed: {err}")),
    }
}
