//! Fixed prompts and user-facing texts
//!
//! This module holds the system directive that seeds every chat transcript,
//! the instruction used for one-shot log summaries, and the static texts
//! shown around the conversation.

/// System directive that seeds every chat transcript
pub const TROUBLESHOOTING_SYSTEM_PROMPT: &str = "You are a professional AI assistant specialized in network and server troubleshooting. \
Your role is to help users diagnose common issues related to connectivity, server performance, configuration errors, and system logs. \
You must clearly state that you are not a certified technician and do not provide emergency IT support. \
If a user asks about anything unrelated to IT troubleshooting, reply: \
'I'm here to help with network and server troubleshooting. Please ask about connectivity issues, server errors, or system configurations.' \
If a user describes critical infrastructure failure or data breach, respond: \
'This may indicate a serious issue. Please contact your IT department or cybersecurity team immediately.'";

/// System instruction for the one-shot log summary request
pub const LOG_SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that analyzes server and network logs.";

/// Prefix placed before the decoded log text in the summary request
pub const LOG_SUMMARY_PREFIX: &str =
    "Please analyze and summarize the following troubleshooting log:\n\n";

/// Assistant reply recorded when a chat turn's remote call fails
pub const CHAT_ERROR_REPLY: &str = "An error occurred while contacting the AI service.";

/// Title shown at the top of the web page and the terminal banner
pub const APP_TITLE: &str = "🛠️ Network and Server Troubleshoot";

/// Placeholder shown in the chat input box
pub const CHAT_INPUT_PLACEHOLDER: &str = "Describe your network or server issue...";

/// Label of the log upload widget
pub const UPLOAD_LABEL: &str = "📁 Upload a log file for analysis";

/// Heading above the decoded log preview
pub const LOG_CONTENT_HEADING: &str = "📄 Log File Content";

/// Heading above a log summary
pub const LOG_SUMMARY_HEADING: &str = "🧾 Log Summary";

/// Static disclaimer footer
pub const DISCLAIMER: &str = "⚠️ Disclaimer: This chatbot does not provide certified IT support or emergency services. \
Always consult your IT administrator or support team for critical infrastructure issues.";

/// Builds the user turn of the log summary request
///
/// # Examples
///
/// ```
/// use troubleshoot::prompts::build_log_summary_prompt;
///
/// let prompt = build_log_summary_prompt("ERROR eth0 link down");
/// assert!(prompt.starts_with("Please analyze and summarize"));
/// assert!(prompt.ends_with("\n\nERROR eth0 link down"));
/// ```
pub fn build_log_summary_prompt(log_text: &str) -> String {
    format!("{}{}", LOG_SUMMARY_PREFIX, log_text)
}
