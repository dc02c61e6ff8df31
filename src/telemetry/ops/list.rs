use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct List;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Dialects, Parts, Urls }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Dialects => "dialects", Phase::Parts => "parts", Phase::Urls => "urls" } }
    fn span(&self) -> Span { match self { Phase::Dialects => info_span!("dialects"), Phase::Parts => info_span!("parts"), Phase::Urls => info_span!("urls") } }
}

impl OpMarker for List {
    const NAME: &'static str = "list";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("list") }
}
