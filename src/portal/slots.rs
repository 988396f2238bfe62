/// One scheduling slot the portal groups course offerings under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDefinition {
    /// Display name shown to the operator.
    pub name: &'static str,
    /// Internal numeric id the listing endpoint is parameterized by.
    pub portal_id: &'static str,
}

/// The slot catalog. Declaration order is scan order, and scan order is
/// the tie-break: the first slot in which a course satisfies the found
/// predicate wins.
pub const SLOTS: [SlotDefinition; 8] = [
    SlotDefinition { name: "G", portal_id: "7" },
    SlotDefinition { name: "H", portal_id: "8" },
    SlotDefinition { name: "M", portal_id: "13" },
    SlotDefinition { name: "N", portal_id: "14" },
    SlotDefinition { name: "O", portal_id: "15" },
    SlotDefinition { name: "P", portal_id: "16" },
    SlotDefinition { name: "Q", portal_id: "17" },
    SlotDefinition { name: "R", portal_id: "18" },
];
