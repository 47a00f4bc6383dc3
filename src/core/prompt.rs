//! Blocking user dialogs: an alert the user must acknowledge and a yes/no
//! confirmation. Each front end supplies its own implementation.

pub trait Prompt {
    /// Show `message` to the user.
    fn alert(&mut self, message: &str);

    /// Ask a yes/no question. Returns true only on an explicit yes.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Non-interactive prompt: alerts go to the log, confirmations use a fixed answer.
pub struct LogPrompt {
    pub answer: bool,
}

impl Prompt for LogPrompt {
    fn alert(&mut self, message: &str) {
        log::warn!("alert: {message}");
    }

    fn confirm(&mut self, question: &str) -> bool {
        log::info!("confirm: {question} -> {}", self.answer);
        self.answer
    }
}
