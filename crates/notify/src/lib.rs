pub mod bot;
pub mod format;
pub mod rate_limit;
pub mod traits;

pub use bot::{resolve_token, send_webapp_button, BotNotifier};
pub use format::{escape_html, format_report, format_report_message};
pub use rate_limit::RateLimiter;
pub use traits::{ChatNotifier, NotifyError};
