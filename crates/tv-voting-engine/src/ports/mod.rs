//! Ports module for the voting engine

pub mod inbound;
pub mod outbound;

pub use inbound::{CastBallot, ReportingApi, VotingApi};
pub use outbound::{Clock, HistorySource, PollStore, VotingEventSink};
