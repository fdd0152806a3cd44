//! Host mutation counters.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub elements_created: u64,
    pub texts_created: u64,
    pub attributes_set: u64,
    pub attributes_removed: u64,
    pub dispatchers_installed: u64,
    pub dispatchers_removed: u64,
    /// Callback list swaps behind an already installed dispatcher. These
    /// happen on every pass and are not host mutations.
    pub callbacks_swapped: u64,
    pub children_appended: u64,
    pub children_replaced: u64,
    pub children_removed: u64,
    pub memo_keys_recorded: u64,
    pub nodes_freed: u64,
}

impl MutationStats {
    /// Total host-visible writes, excluding callback swaps and frees (a free
    /// always follows a counted removal or replacement).
    pub fn mutations(&self) -> u64 {
        self.elements_created
            + self.texts_created
            + self.attributes_set
            + self.attributes_removed
            + self.dispatchers_installed
            + self.dispatchers_removed
            + self.children_appended
            + self.children_replaced
            + self.children_removed
            + self.memo_keys_recorded
    }

    pub fn is_quiet(&self) -> bool {
        self.mutations() == 0
    }
}

impl std::fmt::Display for MutationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "created={}+{} attrs=+{}/-{} dispatchers=+{}/-{} swaps={} children=+{}/~{}/-{} keys={} freed={}",
            self.elements_created,
            self.texts_created,
            self.attributes_set,
            self.attributes_removed,
            self.dispatchers_installed,
            self.dispatchers_removed,
            self.callbacks_swapped,
            self.children_appended,
            self.children_replaced,
            self.children_removed,
            self.memo_keys_recorded,
            self.nodes_freed,
        )
    }
}
