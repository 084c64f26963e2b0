//! Per-paragraph input subscriptions.
//!
//! Every live paragraph holds exactly one `Subscription`, created when the
//! paragraph enters the document and released when it leaves (removal, or
//! detach/re-attach around a migration between pages). Events addressed to a
//! paragraph by id are delivered only while its subscription is attached and
//! declares interest in that input kind.

use core_text::ParagraphId;
use std::collections::HashMap;
use tracing::trace;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct InputInterest: u8 {
        const KEY     = 0b0000_0001;
        const TEXT    = 0b0000_0010;
        const POINTER = 0b0000_0100;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub paragraph: ParagraphId,
    pub interests: InputInterest,
}

#[derive(Debug, Default)]
pub struct InputRoutes {
    subs: HashMap<ParagraphId, Subscription>,
}

impl InputRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscription. Returns false if one was already attached.
    pub fn attach(&mut self, paragraph: ParagraphId, interests: InputInterest) -> bool {
        if self.subs.contains_key(&paragraph) {
            return false;
        }
        trace!(target: "state.routes", paragraph = paragraph.raw(), "attach");
        self.subs.insert(
            paragraph,
            Subscription {
                paragraph,
                interests,
            },
        );
        true
    }

    pub fn detach(&mut self, paragraph: ParagraphId) -> Option<Subscription> {
        let sub = self.subs.remove(&paragraph);
        if sub.is_some() {
            trace!(target: "state.routes", paragraph = paragraph.raw(), "detach");
        }
        sub
    }

    pub fn is_attached(&self, paragraph: ParagraphId) -> bool {
        self.subs.contains_key(&paragraph)
    }

    pub fn accepts(&self, paragraph: ParagraphId, kind: InputInterest) -> bool {
        self.subs
            .get(&paragraph)
            .is_some_and(|s| s.interests.contains(kind))
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Alignment, Paragraph, Style};

    #[test]
    fn attach_is_exclusive_and_detach_releases() {
        let p = Paragraph::new(Style::default(), Alignment::Left);
        let mut routes = InputRoutes::new();
        assert!(routes.attach(p.id(), InputInterest::KEY | InputInterest::TEXT));
        assert!(!routes.attach(p.id(), InputInterest::all()));
        assert!(routes.accepts(p.id(), InputInterest::TEXT));
        assert!(!routes.accepts(p.id(), InputInterest::POINTER));
        assert!(routes.detach(p.id()).is_some());
        assert!(!routes.is_attached(p.id()));
        assert!(routes.is_empty());
    }
}
