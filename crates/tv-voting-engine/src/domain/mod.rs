//! Domain layer for the voting engine
//!
//! Pure rules: no I/O, no locking, no clock reads. Everything time-dependent
//! takes `now` as an argument.

pub mod eligibility;
pub mod history;
pub mod poll;
pub mod status;
pub mod views;

pub use eligibility::check_eligibility;
pub use history::{HistoryEntry, UserPollEntry, UserProfile};
pub use poll::{Poll, PollDraft, ValidPoll, MAX_OPTIONS, MIN_OPTIONS};
pub use status::{evaluate, evaluate_window, leading_options, winning_options, PollStatus};
pub use views::{CastReceipt, OptionTally, PollDetail, PollSummary};
