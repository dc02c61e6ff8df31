use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Download;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, Fetch, Extract, Group, Write }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::Fetch => "fetch",
        Phase::Extract => "extract",
        Phase::Group => "group",
        Phase::Write => "write",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::Fetch => info_span!("fetch"),
        Phase::Extract => info_span!("extract"),
        Phase::Group => info_span!("group"),
        Phase::Write => info_span!("write"),
    }}
}

impl OpMarker for Download {
    const NAME: &'static str = "download";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("download") }
}
