//! An append-only log of mutations applied to a [`RoutingNodes`](super::RoutingNodes)
//! during one allocator pass. Tests assert against it; `tracing` mirrors each
//! entry at `trace` level for production observability.

#[derive(Debug, Default, Clone)]
pub struct RoutingChanges {
    events: Vec<String>,
}

impl RoutingChanges {
    pub fn record(&mut self, event: impl Into<String>) {
        let event = event.into();
        tracing::trace!(%event, "routing change");
        self.events.push(event);
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
