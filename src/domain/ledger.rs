use serde::{Deserialize, Serialize};

use super::{Cents, LedgerError};

/// A member of the group sharing expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display name, unique within the ledger (case-sensitive)
    pub name: String,
    /// Running total of what this participant paid minus what they consumed
    pub net_balance: Cents,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            net_balance: 0,
        }
    }

    pub fn with_balance(mut self, net_balance: Cents) -> Self {
        self.net_balance = net_balance;
        self
    }
}

/// Ordered collection of participants and their net balances.
///
/// Insertion order is kept for display and for matching weighted shares to
/// participants; it never changes the outcome of a calculation otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    participants: Vec<Participant>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored rows, rejecting empty or repeated names.
    pub fn from_entries<I, N>(entries: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = (N, Cents)>,
        N: Into<String>,
    {
        let mut ledger = Self::new();
        for (name, balance) in entries {
            let name = ledger.add(name)?.name.clone();
            ledger.apply_delta(&name, balance)?;
        }
        Ok(ledger)
    }

    /// Add a participant with a zero balance.
    ///
    /// Surrounding whitespace is stripped before the name is checked and
    /// stored, so `" Bob"` and `"Bob"` are the same participant.
    pub fn add(&mut self, name: impl Into<String>) -> Result<&Participant, LedgerError> {
        let raw = name.into();
        let name = raw.trim();
        if name.is_empty() || self.contains(name) {
            return Err(LedgerError::DuplicateParticipant(name.to_string()));
        }

        self.participants.push(Participant::new(name));
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Remove a participant together with their balance.
    pub fn remove(&mut self, name: &str) -> Result<Participant, LedgerError> {
        let index = self
            .position(name)
            .ok_or_else(|| LedgerError::ParticipantNotFound(name.to_string()))?;
        Ok(self.participants.remove(index))
    }

    pub fn reset(&mut self) {
        self.participants.clear();
    }

    /// Participant names in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &str> + '_ {
        self.participants.iter().map(|p| p.name.as_str())
    }

    /// Add `delta` to a participant's net balance. A result outside the `Cents`
    /// range is rejected as `InvalidAmount(delta)` and nothing changes.
    pub fn apply_delta(&mut self, name: &str, delta: Cents) -> Result<Cents, LedgerError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| LedgerError::ParticipantNotFound(name.to_string()))?;
        participant.net_balance = participant
            .net_balance
            .checked_add(delta)
            .ok_or(LedgerError::InvalidAmount(delta))?;
        Ok(participant.net_balance)
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Sum of all net balances, or `InvalidAmount` with the balance that took
    /// the sum out of range.
    pub fn total(&self) -> Result<Cents, LedgerError> {
        self.participants.iter().try_fold(0, |sum: Cents, p| {
            sum.checked_add(p.net_balance)
                .ok_or(LedgerError::InvalidAmount(p.net_balance))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_of(names: &[&str]) -> Ledger {
        let mut ledger = Ledger::new();
        for name in names {
            ledger.add(*name).unwrap();
        }
        ledger
    }

    #[test]
    fn test_add_starts_at_zero() {
        let ledger = ledger_of(&["Alice"]);
        assert_eq!(ledger.get("Alice").map(|p| p.net_balance), Some(0));
    }

    #[test]
    fn test_add_duplicate_leaves_ledger_unchanged() {
        let mut ledger = ledger_of(&["Alice", "Bob"]);
        ledger.apply_delta("Alice", 500).unwrap();
        let before = ledger.clone();

        let result = ledger.add("Alice");
        assert_eq!(
            result,
            Err(LedgerError::DuplicateParticipant("Alice".into()))
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let mut ledger = Ledger::new();
        assert!(matches!(
            ledger.add(""),
            Err(LedgerError::DuplicateParticipant(_))
        ));
        assert!(matches!(
            ledger.add("   "),
            Err(LedgerError::DuplicateParticipant(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_strips_surrounding_whitespace() {
        let mut ledger = ledger_of(&["Bob"]);

        assert_eq!(
            ledger.add(" Bob"),
            Err(LedgerError::DuplicateParticipant("Bob".into()))
        );
        assert_eq!(ledger.add("  Carol ").map(|p| p.name.clone()), Ok("Carol".into()));
        assert_eq!(ledger.list().collect::<Vec<_>>(), vec!["Bob", "Carol"]);
    }

    #[test]
    fn test_apply_delta_rejects_overflow() {
        let mut ledger = ledger_of(&["Alice"]);
        ledger.apply_delta("Alice", Cents::MAX - 10).unwrap();
        let before = ledger.clone();

        assert_eq!(
            ledger.apply_delta("Alice", 11),
            Err(LedgerError::InvalidAmount(11))
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_total_rejects_overflow() {
        let ledger = Ledger::from_entries(vec![("Alice", Cents::MAX), ("Bob", 1)]).unwrap();
        assert_eq!(ledger.total(), Err(LedgerError::InvalidAmount(1)));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let ledger = ledger_of(&["alice", "Alice"]);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_remove_missing_leaves_ledger_unchanged() {
        let mut ledger = ledger_of(&["Alice"]);
        let before = ledger.clone();

        assert_eq!(
            ledger.remove("Zoe"),
            Err(LedgerError::ParticipantNotFound("Zoe".into()))
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_drops_balance() {
        let mut ledger = ledger_of(&["Alice", "Bob"]);
        ledger.apply_delta("Bob", -700).unwrap();

        let removed = ledger.remove("Bob").unwrap();
        assert_eq!(removed.net_balance, -700);
        assert_eq!(ledger.list().collect::<Vec<_>>(), vec!["Alice"]);

        // Re-adding starts from scratch
        ledger.add("Bob").unwrap();
        assert_eq!(ledger.get("Bob").map(|p| p.net_balance), Some(0));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let ledger = ledger_of(&["Carol", "Alice", "Bob"]);
        assert_eq!(
            ledger.list().collect::<Vec<_>>(),
            vec!["Carol", "Alice", "Bob"]
        );
        // Restartable
        assert_eq!(ledger.list().count(), 3);
    }

    #[test]
    fn test_apply_delta_unknown_participant() {
        let mut ledger = ledger_of(&["Alice"]);
        assert_eq!(
            ledger.apply_delta("Bob", 100),
            Err(LedgerError::ParticipantNotFound("Bob".into()))
        );
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ledger = ledger_of(&["Alice", "Bob"]);
        ledger.apply_delta("Alice", 100).unwrap();
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), Ok(0));
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let result = Ledger::from_entries(vec![("Alice", 100), ("Alice", 200)]);
        assert!(matches!(result, Err(LedgerError::DuplicateParticipant(_))));

        let ledger = Ledger::from_entries(vec![("Alice", 100), ("Bob", -100)]).unwrap();
        assert_eq!(ledger.total(), Ok(0));
        assert_eq!(ledger.get("Bob").map(|p| p.net_balance), Some(-100));
    }
}
