use std::io::{self, Write};
use std::sync::atomic::Ordering;

use interview_gateway::{CancelSignal, Interview, InterviewGateway, Message, Role};

use crate::commands::{parse_slash_command, SlashCommand};

pub const HELP_TEXT: &str =
    "Commands: /help, /restart, /quit (or /exit). Anything else is sent as your answer.";
const NO_INTERVIEW_TEXT: &str = "No active interview. Type /restart to try again or /quit to exit.";
const CONCLUDED_TEXT: &str =
    "The interview has concluded. Type /restart to begin again or /quit to exit.";

/// Line-oriented interview host.
///
/// Every call into the gateway is awaited before the next line is read, so
/// answers are serialized. `cancel` is cleared at the start of each call.
pub struct App {
    gateway: InterviewGateway,
    activation_code: Option<String>,
    interview: Option<Interview>,
    rendered: usize,
    pub should_exit: bool,
}

impl App {
    pub fn new(gateway: InterviewGateway, activation_code: Option<String>) -> Self {
        Self {
            gateway,
            activation_code,
            interview: None,
            rendered: 0,
            should_exit: false,
        }
    }

    pub fn interview(&self) -> Option<&Interview> {
        self.interview.as_ref()
    }

    /// Bootstraps a fresh interview, discarding any current one.
    pub async fn start<W: Write>(&mut self, cancel: &CancelSignal, out: &mut W) -> io::Result<()> {
        cancel.store(false, Ordering::Release);
        self.interview = None;
        self.rendered = 0;

        let profile = self.gateway.backend_profile();
        writeln!(out, "Connecting to {} backend at {}...", profile.backend_id, profile.endpoint)?;

        match self
            .gateway
            .start_session(self.activation_code.as_deref(), Some(cancel))
            .await
        {
            Ok(interview) => {
                writeln!(out, "Interview for {}.", interview.session().job_title())?;
                self.interview = Some(interview);
                self.render_new_messages(out)?;
                self.report_if_concluded(out)
            }
            Err(error) => {
                tracing::warn!(%error, "interview bootstrap failed");
                writeln!(out, "{}", error.user_message())?;
                writeln!(out, "{NO_INTERVIEW_TEXT}")
            }
        }
    }

    pub async fn on_line<W: Write>(
        &mut self,
        line: &str,
        cancel: &CancelSignal,
        out: &mut W,
    ) -> io::Result<()> {
        let text = line.trim();
        if text.is_empty() {
            return Ok(());
        }

        if let Some(command) = parse_slash_command(text) {
            return match command {
                SlashCommand::Help => writeln!(out, "{HELP_TEXT}"),
                SlashCommand::Restart => self.start(cancel, out).await,
                SlashCommand::Quit => {
                    self.should_exit = true;
                    writeln!(out, "Goodbye.")
                }
                SlashCommand::Unknown(command) => {
                    writeln!(out, "Unknown command: {command}. {HELP_TEXT}")
                }
            };
        }

        self.submit(text, cancel, out).await
    }

    async fn submit<W: Write>(
        &mut self,
        answer: &str,
        cancel: &CancelSignal,
        out: &mut W,
    ) -> io::Result<()> {
        let Some(interview) = self.interview.as_mut() else {
            return writeln!(out, "{NO_INTERVIEW_TEXT}");
        };
        if interview.session().is_concluded() {
            return writeln!(out, "{CONCLUDED_TEXT}");
        }

        cancel.store(false, Ordering::Release);
        match self.gateway.submit_answer(interview, answer, Some(cancel)).await {
            Ok(_) => {
                self.render_new_messages(out)?;
                self.report_if_concluded(out)
            }
            Err(error) => {
                tracing::warn!(%error, "answer not accepted");
                writeln!(out, "{}", error.user_message())
            }
        }
    }

    fn render_new_messages<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(interview) = self.interview.as_ref() else {
            return Ok(());
        };
        let messages = interview.transcript().messages();
        for message in &messages[self.rendered.min(messages.len())..] {
            writeln!(out, "{}", format_message(message))?;
        }
        self.rendered = messages.len();
        Ok(())
    }

    fn report_if_concluded<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self
            .interview
            .as_ref()
            .is_some_and(|interview| interview.session().is_concluded())
        {
            writeln!(out, "{CONCLUDED_TEXT}")?;
        }
        Ok(())
    }
}

pub fn format_message(message: &Message) -> String {
    let time = message.created_at().time();
    let speaker = match message.role() {
        Role::Interviewer => "Interviewer",
        Role::Candidate => "You",
    };
    format!(
        "[{:02}:{:02}:{:02}] {speaker}: {}",
        time.hour(),
        time.minute(),
        time.second(),
        message.content()
    )
}
