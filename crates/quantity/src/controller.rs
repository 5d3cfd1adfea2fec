//! The quantity state machine behind a product page's quantity input.
//!
//! Two phases:
//!
//! - `Valid`: the current quantity went through [`QuantityState::normalize`]
//!   or an MOQ snap.
//! - `PendingValidation`: a raw keyboard edit is sitting in the input and has
//!   not been committed yet.
//!
//! The only ways back to `Valid` are a commit/step (normalize) or an MOQ
//! refresh that snaps the quantity. Submission is gated on the last validated
//! quantity, never on a pending edit.

use packcart_core::{pack_size_or_default, parse_leading_int, parse_moq};

use crate::error::QuantityError;
use crate::state::QuantityState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityPhase {
    Valid,
    PendingValidation { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityController {
    state: QuantityState,
    phase: QuantityPhase,
}

impl QuantityController {
    /// Build the controller from the page attributes.
    ///
    /// - `encoded_pack_size`: base64 pack size; unusable values give 1.
    /// - `moq_attribute`: plain MOQ; unusable values give the pack size.
    /// - `existing_value`: whatever the quantity input already holds. It is
    ///   normalized, then snapped up to the MOQ if unset or below it.
    pub fn initialize(
        encoded_pack_size: Option<&str>,
        moq_attribute: Option<&str>,
        existing_value: Option<&str>,
    ) -> Self {
        let pack_size = pack_size_or_default(encoded_pack_size);
        let moq = parse_moq(moq_attribute, pack_size);

        let rules = QuantityState::new(pack_size, moq, None);
        let existing = existing_value
            .and_then(parse_leading_int)
            .map(|value| rules.normalize(value));

        let mut controller = Self::from_state(QuantityState {
            current_quantity: existing,
            ..rules
        });
        controller.snap_to_moq();

        tracing::debug!(
            pack_size,
            moq,
            quantity = ?controller.state.current_quantity,
            "quantity controller initialized"
        );
        controller
    }

    pub fn from_state(state: QuantityState) -> Self {
        Self {
            state,
            phase: QuantityPhase::Valid,
        }
    }

    pub fn state(&self) -> QuantityState {
        self.state
    }

    pub fn phase(&self) -> &QuantityPhase {
        &self.phase
    }

    pub fn pack_size(&self) -> u32 {
        self.state.pack_size
    }

    pub fn minimum_order_quantity(&self) -> u32 {
        self.state.minimum_order_quantity
    }

    /// Last validated quantity.
    pub fn current_quantity(&self) -> Option<u32> {
        self.state.current_quantity
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, QuantityPhase::PendingValidation { .. })
    }

    pub fn normalize(&self, requested: i64) -> u32 {
        self.state.normalize(requested)
    }

    /// Record a raw keyboard edit without validating it.
    pub fn edit(&mut self, raw: impl Into<String>) {
        self.phase = QuantityPhase::PendingValidation { raw: raw.into() };
    }

    /// Commit a raw value (blur/change). Unparsable input collapses to one pack.
    pub fn commit(&mut self, raw: &str) -> QuantityState {
        self.set_quantity(parse_leading_int(raw).unwrap_or(0))
    }

    /// Normalize `requested` and make it the current quantity.
    pub fn set_quantity(&mut self, requested: i64) -> QuantityState {
        let quantity = self.state.normalize(requested);
        self.state.current_quantity = Some(quantity);
        self.phase = QuantityPhase::Valid;
        tracing::debug!(requested, quantity, "quantity committed");
        self.state
    }

    /// Add one pack. An unset quantity counts as 0.
    pub fn increment(&mut self) -> QuantityState {
        let current = i64::from(self.state.current_quantity.unwrap_or(0));
        self.set_quantity(current + i64::from(self.state.pack_size))
    }

    /// Remove one pack; does nothing at or below a single pack.
    pub fn decrement(&mut self) -> QuantityState {
        match self.state.current_quantity {
            Some(current) if current > self.state.pack_size => {
                self.set_quantity(i64::from(current - self.state.pack_size))
            }
            _ => self.state,
        }
    }

    /// Re-read the MOQ attribute (e.g. after a variant switch).
    ///
    /// If the quantity in the input (a pending edit takes precedence) is unset
    /// or below the new MOQ, the current quantity becomes exactly the MOQ,
    /// without pack normalization.
    pub fn refresh_moq(&mut self, moq_attribute: Option<&str>) -> QuantityState {
        let moq = parse_moq(moq_attribute, self.state.pack_size);
        if moq != self.state.minimum_order_quantity {
            tracing::debug!(
                previous = self.state.minimum_order_quantity,
                moq,
                "minimum order quantity changed"
            );
        }
        self.state.minimum_order_quantity = moq;
        self.snap_to_moq();
        self.state
    }

    pub fn validate_for_submission(&self) -> Result<u32, QuantityError> {
        self.state.validate_for_submission()
    }

    /// Gate against an MOQ read from the page right now, without storing it.
    /// Unusable values fall back to `fallback_moq`.
    pub fn validate_against(
        &self,
        moq_attribute: Option<&str>,
        fallback_moq: u32,
    ) -> Result<u32, QuantityError> {
        QuantityState {
            minimum_order_quantity: parse_moq(moq_attribute, fallback_moq),
            ..self.state
        }
        .validate_for_submission()
    }

    /// Forget the quantity and any pending edit.
    pub fn dispose(&mut self) {
        self.state.current_quantity = None;
        self.phase = QuantityPhase::Valid;
    }

    fn snap_to_moq(&mut self) {
        let effective = match &self.phase {
            QuantityPhase::PendingValidation { raw } => parse_leading_int(raw),
            QuantityPhase::Valid => self.state.current_quantity.map(i64::from),
        };

        let moq = self.state.minimum_order_quantity;
        if effective.is_none_or(|quantity| quantity < i64::from(moq)) {
            self.state.current_quantity = Some(moq);
            self.phase = QuantityPhase::Valid;
            tracing::debug!(moq, "quantity snapped to minimum order quantity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use proptest::prelude::*;

    fn encode(pack_size: u32) -> String {
        base64::engine::general_purpose::STANDARD.encode(pack_size.to_string())
    }

    fn controller(pack_size: u32, moq: u32) -> QuantityController {
        QuantityController::initialize(Some(&encode(pack_size)), Some(&moq.to_string()), None)
    }

    #[test]
    fn initialize_decodes_attributes_and_snaps_to_moq() {
        let c = controller(6, 24);
        assert_eq!(c.pack_size(), 6);
        assert_eq!(c.minimum_order_quantity(), 24);
        assert_eq!(c.current_quantity(), Some(24));
        assert_eq!(c.phase(), &QuantityPhase::Valid);
    }

    #[test]
    fn initialize_keeps_larger_existing_value() {
        let c = QuantityController::initialize(Some(&encode(6)), Some("24"), Some("36"));
        assert_eq!(c.current_quantity(), Some(36));

        // Not a whole number of packs: normalized to 6, then snapped to the MOQ.
        let c = QuantityController::initialize(Some(&encode(6)), Some("24"), Some("40"));
        assert_eq!(c.current_quantity(), Some(24));
    }

    #[test]
    fn initialize_falls_back_on_bad_attributes() {
        let c = QuantityController::initialize(Some("%%%"), None, None);
        assert_eq!(c.pack_size(), 1);
        assert_eq!(c.minimum_order_quantity(), 1);
        assert_eq!(c.current_quantity(), Some(1));

        let c = QuantityController::initialize(Some(&encode(6)), Some("abc"), None);
        assert_eq!(c.minimum_order_quantity(), 6);
        assert_eq!(c.current_quantity(), Some(6));
    }

    #[test]
    fn typed_value_below_moq_collapses_to_pack_and_fails_gate() {
        let mut c = controller(6, 24);
        c.edit("20");
        assert!(c.is_pending());

        let state = c.commit("20");
        assert_eq!(state.current_quantity, Some(6));
        assert!(!c.is_pending());
        assert_eq!(
            c.validate_for_submission(),
            Err(QuantityError::BelowMinimum { quantity: 6, minimum: 24 })
        );
    }

    #[test]
    fn unparsable_commit_collapses_to_pack() {
        let mut c = controller(6, 6);
        assert_eq!(c.commit("lots").current_quantity, Some(6));
        assert_eq!(c.commit("").current_quantity, Some(6));
    }

    #[test]
    fn four_increments_from_unset_reach_moq() {
        let mut c = QuantityController::from_state(QuantityState::new(6, 24, None));

        let seen: Vec<Option<u32>> = (0..4).map(|_| c.increment().current_quantity).collect();
        assert_eq!(seen, vec![Some(6), Some(12), Some(18), Some(24)]);
        assert_eq!(c.validate_for_submission(), Ok(24));
    }

    #[test]
    fn decrement_stops_at_one_pack() {
        let mut c = QuantityController::from_state(QuantityState::new(6, 6, Some(12)));
        assert_eq!(c.decrement().current_quantity, Some(6));
        assert_eq!(c.decrement().current_quantity, Some(6));

        let mut unset = QuantityController::from_state(QuantityState::new(6, 6, None));
        assert_eq!(unset.decrement().current_quantity, None);
    }

    #[test]
    fn stepping_from_moq_snap_renormalizes() {
        // MOQ 20 is not a whole number of packs; stepping normalizes again.
        let mut c = controller(6, 20);
        assert_eq!(c.current_quantity(), Some(20));
        assert_eq!(c.increment().current_quantity, Some(6));
    }

    #[test]
    fn refresh_moq_snaps_exactly_without_normalizing() {
        let mut c = controller(6, 6);
        assert_eq!(c.current_quantity(), Some(6));

        let state = c.refresh_moq(Some("20"));
        assert_eq!(state.minimum_order_quantity, 20);
        assert_eq!(state.current_quantity, Some(20));
        assert_eq!(c.validate_for_submission(), Ok(20));
    }

    #[test]
    fn refresh_moq_keeps_quantity_at_or_above_new_moq() {
        let mut c = QuantityController::from_state(QuantityState::new(6, 6, Some(36)));
        let state = c.refresh_moq(Some("24"));
        assert_eq!(state.current_quantity, Some(36));
    }

    #[test]
    fn refresh_moq_looks_at_pending_edit() {
        let mut c = QuantityController::from_state(QuantityState::new(6, 6, Some(36)));

        c.edit("1");
        c.refresh_moq(Some("24"));
        assert_eq!(c.current_quantity(), Some(24));
        assert!(!c.is_pending());

        c.edit("");
        c.refresh_moq(Some("24"));
        assert_eq!(c.current_quantity(), Some(24));
        assert!(!c.is_pending());

        // A pending edit that clears the MOQ stays pending.
        c.edit("48");
        c.refresh_moq(Some("24"));
        assert!(c.is_pending());
        assert_eq!(c.current_quantity(), Some(24));
    }

    #[test]
    fn validate_ignores_pending_edit() {
        let mut c = controller(6, 24);
        c.edit("1");
        assert_eq!(c.validate_for_submission(), Ok(24));
    }

    #[test]
    fn validate_against_live_attribute() {
        let c = QuantityController::from_state(QuantityState::new(6, 6, Some(12)));
        assert_eq!(c.validate_against(Some("12"), 1), Ok(12));
        assert_eq!(
            c.validate_against(Some("24"), 1),
            Err(QuantityError::BelowMinimum { quantity: 12, minimum: 24 })
        );
        assert_eq!(c.validate_against(None, 1), Ok(12));
        assert_eq!(c.minimum_order_quantity(), 6);
    }

    #[test]
    fn dispose_clears_quantity() {
        let mut c = controller(6, 24);
        c.edit("30");
        c.dispose();
        assert_eq!(c.current_quantity(), None);
        assert!(!c.is_pending());
        assert!(c.validate_for_submission().is_err());
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Increment,
        Decrement,
        Commit(i64),
        Refresh(u32),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Increment),
            Just(Step::Decrement),
            (-50i64..200).prop_map(Step::Commit),
            (1u32..100).prop_map(Step::Refresh),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 500,
            ..ProptestConfig::default()
        })]

        /// Property: no sequence of steps leaves the quantity below one pack,
        /// and decrement never goes under it.
        #[test]
        fn quantity_never_drops_below_pack(
            pack in 1u32..12,
            moq in 1u32..60,
            steps in prop::collection::vec(step(), 0..40),
        ) {
            let mut c = QuantityController::from_state(QuantityState::new(pack, moq, Some(pack)));
            for step in steps {
                let before = c.current_quantity().unwrap();
                let state = match step {
                    Step::Increment => c.increment(),
                    Step::Decrement => c.decrement(),
                    Step::Commit(q) => c.commit(&q.to_string()),
                    Step::Refresh(m) => c.refresh_moq(Some(&m.to_string())),
                };
                let current = state.current_quantity.unwrap();
                prop_assert!(current >= pack.min(state.minimum_order_quantity));
                if !matches!(step, Step::Refresh(_)) {
                    // Either normalized (at least one pack) or left untouched.
                    prop_assert!(current >= pack || current == before);
                }
            }
        }

        /// Property: validation never mutates the controller.
        #[test]
        fn validate_is_pure(pack in 1u32..12, moq in 1u32..60, q in 0u32..100) {
            let c = QuantityController::from_state(QuantityState::new(pack, moq, Some(q)));
            let before = c.clone();
            let _ = c.validate_for_submission();
            prop_assert_eq!(c, before);
        }
    }
}
