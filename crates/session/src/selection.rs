use protocol::GeoFeature;

/// Single-feature selection.
///
/// Membership is decided by `place_name` equality, so two features sharing a
/// name are indistinguishable here even if their coordinates differ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionCoordinator {
    selected: Option<GeoFeature>,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection.
    ///
    /// The caller guarantees `feature` comes from the current result set.
    pub fn select(&mut self, feature: GeoFeature) {
        self.selected = Some(feature);
    }

    /// Returns `true` if something was selected before.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    pub fn selected(&self) -> Option<&GeoFeature> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn is_selected(&self, feature: &GeoFeature) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|s| s.same_place(feature))
    }
}
