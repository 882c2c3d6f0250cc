use chrono::NaiveDate;
use log::{info, warn};

use crate::error::{KakeiboError, Result, ValidationError};
use crate::models::{ExpenseDraft, ExpenseRecord};
use crate::storage::Storage;

/// Storage key the whole ledger is saved under.
pub const STORAGE_KEY: &str = "expensesData";

/// Trim and check raw form fields. Nothing is touched on failure.
pub fn validate(
    date: &str,
    category: &str,
    memo: &str,
    amount: &str,
) -> std::result::Result<ExpenseDraft, ValidationError> {
    let date = date.trim();
    if date.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::InvalidDate(date.to_string()));
    }
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    let memo = memo.trim();
    if memo.is_empty() {
        return Err(ValidationError::MissingMemo);
    }
    let amount = parse_amount(amount)?;

    Ok(ExpenseDraft {
        date: date.to_string(),
        category: category.to_string(),
        memo: memo.to_string(),
        amount,
    })
}

/// Parse an amount field. Rejects empty text, garbage, and non-finite values.
pub fn parse_amount(text: &str) -> std::result::Result<f64, ValidationError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidAmount(trimmed.to_string())),
    }
}

/// Owns the ledger and its persisted mirror. Every mutation is saved in full
/// before it returns.
pub struct LedgerStore<S: Storage> {
    storage: S,
    records: Vec<ExpenseRecord>,
    /// `None` once the id space is used up.
    next_id: Option<i64>,
}

impl<S: Storage> LedgerStore<S> {
    /// Read the saved ledger, or start empty when nothing is saved yet.
    pub fn load(storage: S) -> Result<Self> {
        let records: Vec<ExpenseRecord> = match storage.get_item(STORAGE_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| {
                warn!("event=ledger_load status=corrupt key={STORAGE_KEY} error={source}");
                KakeiboError::CorruptState {
                    key: STORAGE_KEY.to_string(),
                    source,
                }
            })?,
            None => Vec::new(),
        };

        let next_id = match records.iter().map(|r| r.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };
        info!(
            "event=ledger_load status=ok records={} next_id={next_id:?}",
            records.len()
        );

        Ok(Self {
            storage,
            records,
            next_id,
        })
    }

    /// Validate and append a new record, then persist the whole ledger.
    pub fn add(
        &mut self,
        date: &str,
        category: &str,
        memo: &str,
        amount: &str,
    ) -> Result<&[ExpenseRecord]> {
        let draft = validate(date, category, memo, amount).map_err(|e| {
            info!("event=validation_failed reason=\"{e}\"");
            e
        })?;

        let Some(id) = self.next_id else {
            warn!("event=expense_add status=ids_exhausted");
            return Err(KakeiboError::IdsExhausted);
        };
        self.records.push(draft.into_record(id));
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        self.next_id = id.checked_add(1);

        info!("event=expense_add id={id} records={}", self.records.len());
        Ok(&self.records)
    }

    /// Remove the record with `id` if present. The ledger is persisted either way.
    pub fn delete(&mut self, id: i64) -> Result<&[ExpenseRecord]> {
        let position = self.records.iter().position(|r| r.id == id);
        let removed = position.map(|idx| (idx, self.records.remove(idx)));

        if let Err(e) = self.persist() {
            if let Some((idx, record)) = removed {
                self.records.insert(idx, record);
            }
            return Err(e);
        }

        info!(
            "event=expense_delete id={id} found={} records={}",
            removed.is_some(),
            self.records.len()
        );
        Ok(&self.records)
    }

    pub fn get_all(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&ExpenseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.storage.set_item(STORAGE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, SqliteStorage};
    use proptest::prelude::*;

    fn seeded_store() -> LedgerStore<MemoryStorage> {
        let mut store = LedgerStore::load(MemoryStorage::new()).unwrap();
        store.add("2024-01-01", "Food", "lunch", "1000").unwrap();
        store.add("2024-01-02", "Food", "dinner", "1500").unwrap();
        store.add("2024-01-03", "Transport", "train", "300").unwrap();
        store
    }

    /// Storage whose writes always fail.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(KakeiboError::Other("disk full".to_string()))
        }
    }

    #[test]
    fn test_load_empty_storage() {
        let store = LedgerStore::load(MemoryStorage::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.storage().writes(), 0);
    }

    #[test]
    fn test_load_corrupt_state_fails() {
        let storage = MemoryStorage::with_item(STORAGE_KEY, "{not json");
        let err = LedgerStore::load(storage).err().unwrap();
        assert!(matches!(err, KakeiboError::CorruptState { .. }));
    }

    #[test]
    fn test_load_wrong_shape_fails() {
        let storage = MemoryStorage::with_item(STORAGE_KEY, r#"{"id": 1}"#);
        assert!(LedgerStore::load(storage).is_err());
    }

    #[test]
    fn test_add_trims_and_parses() {
        let mut store = LedgerStore::load(MemoryStorage::new()).unwrap();
        store.add(" 2024-01-01 ", "  Food ", " lunch  ", " 1000.5 ").unwrap();
        let r = &store.get_all()[0];
        assert_eq!(r.date, "2024-01-01");
        assert_eq!(r.category, "Food");
        assert_eq!(r.memo, "lunch");
        assert_eq!(r.amount, 1000.5);
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_add_accepts_negative_amounts() {
        let mut store = LedgerStore::load(MemoryStorage::new()).unwrap();
        store.add("2024-01-01", "Refund", "returned shoes", "-4200").unwrap();
        assert_eq!(store.get_all()[0].amount, -4200.0);
    }

    #[test]
    fn test_add_rejects_bad_amount_without_write() {
        let mut store = seeded_store();
        let writes = store.storage().writes();
        let err = store.add("2024-01-04", "Food", "snack", "abc").err().unwrap();
        assert!(matches!(
            err,
            KakeiboError::Validation(ValidationError::InvalidAmount(_))
        ));
        assert_eq!(store.len(), 3);
        assert_eq!(store.storage().writes(), writes);
    }

    #[test]
    fn test_validate_each_field() {
        assert_eq!(
            validate("", "Food", "lunch", "1"),
            Err(ValidationError::MissingDate)
        );
        assert_eq!(
            validate("2024-13-01", "Food", "lunch", "1"),
            Err(ValidationError::InvalidDate("2024-13-01".to_string()))
        );
        assert_eq!(
            validate("2024-01-01", "   ", "lunch", "1"),
            Err(ValidationError::MissingCategory)
        );
        assert_eq!(
            validate("2024-01-01", "Food", "\t", "1"),
            Err(ValidationError::MissingMemo)
        );
        assert!(matches!(
            validate("2024-01-01", "Food", "lunch", ""),
            Err(ValidationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_amount_rejects_non_finite() {
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("1e400").is_err());
        assert_eq!(parse_amount("1e3"), Ok(1000.0));
        assert_eq!(parse_amount("-0.25"), Ok(-0.25));
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let store = seeded_store();
        let ids: Vec<i64> = store.get_all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let json = r#"[{"id":1704067200000,"date":"2024-01-01","category":"Food","memo":"lunch","amount":1000}]"#;
        let mut store = LedgerStore::load(MemoryStorage::with_item(STORAGE_KEY, json)).unwrap();
        store.add("2024-01-02", "Food", "dinner", "1500").unwrap();
        assert_eq!(store.get_all()[1].id, 1704067200001);
    }

    #[test]
    fn test_load_with_largest_possible_id() {
        let json = format!(
            r#"[{{"id":{},"date":"2024-01-01","category":"Food","memo":"lunch","amount":1000}}]"#,
            i64::MAX
        );
        let mut store = LedgerStore::load(MemoryStorage::with_item(STORAGE_KEY, &json)).unwrap();
        assert_eq!(store.len(), 1);

        let err = store.add("2024-01-02", "Food", "dinner", "1500").err().unwrap();
        assert!(matches!(err, KakeiboError::IdsExhausted));
        assert_eq!(store.len(), 1);
        assert_eq!(store.storage().writes(), 0);

        // Deleting still works on an exhausted ledger
        store.delete(i64::MAX).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_last_id_is_issued_once() {
        let json = format!(
            r#"[{{"id":{},"date":"2024-01-01","category":"Food","memo":"lunch","amount":1000}}]"#,
            i64::MAX - 1
        );
        let mut store = LedgerStore::load(MemoryStorage::with_item(STORAGE_KEY, &json)).unwrap();
        store.add("2024-01-02", "Food", "dinner", "1500").unwrap();
        assert_eq!(store.get_all()[1].id, i64::MAX);
        assert!(matches!(
            store.add("2024-01-03", "Food", "snack", "200"),
            Err(KakeiboError::IdsExhausted)
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = seeded_store();
        store.delete(3).unwrap();
        store.add("2024-01-04", "Food", "snack", "200").unwrap();
        assert_eq!(store.get_all().last().unwrap().id, 4);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut store = seeded_store();
        let remaining = store.delete(1).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|r| r.id != 1));
        assert_eq!(remaining[0].memo, "dinner");
    }

    #[test]
    fn test_delete_missing_id_still_persists() {
        let mut store = seeded_store();
        let writes = store.storage().writes();
        let before = store.get_all().to_vec();
        store.delete(99).unwrap();
        assert_eq!(store.get_all(), before.as_slice());
        assert_eq!(store.storage().writes(), writes + 1);
    }

    #[test]
    fn test_delete_twice_same_as_once() {
        let mut once = seeded_store();
        once.delete(2).unwrap();
        let mut twice = seeded_store();
        twice.delete(2).unwrap();
        twice.delete(2).unwrap();
        assert_eq!(once.get_all(), twice.get_all());
    }

    #[test]
    fn test_failed_persist_rolls_back_add() {
        let mut store = LedgerStore::load(BrokenStorage).unwrap();
        assert!(store.add("2024-01-01", "Food", "lunch", "1000").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_round_trip_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let expected = {
            let mut store = LedgerStore::load(SqliteStorage::open(&path).unwrap()).unwrap();
            store.add("2024-01-01", "Food", "lunch", "1000").unwrap();
            store.add("2024-01-02", "Food", "dinner", "1500").unwrap();
            store.add("2024-01-03", "Transport", "train", "300").unwrap();
            store.delete(2).unwrap();
            store.get_all().to_vec()
        };
        let reloaded = LedgerStore::load(SqliteStorage::open(&path).unwrap()).unwrap();
        assert_eq!(reloaded.get_all(), expected.as_slice());
        assert_eq!(reloaded.get(3).map(|r| r.memo.as_str()), Some("train"));
    }

    proptest! {
        #[test]
        fn add_grows_by_one(amount in -1_000_000i64..1_000_000, category in "[A-Za-z]{1,12}") {
            let mut store = seeded_store();
            let before = store.len();
            store.add("2024-02-01", &category, "memo", &amount.to_string()).unwrap();
            prop_assert_eq!(store.len(), before + 1);
            let last = store.get_all().last().unwrap();
            prop_assert_eq!(&last.category, &category);
            prop_assert_eq!(last.amount, amount as f64);
        }

        #[test]
        fn invalid_add_leaves_ledger(amount in "[a-z]{1,8}") {
            let mut store = seeded_store();
            prop_assert!(store.add("2024-02-01", "Food", "memo", &amount).is_err());
            prop_assert_eq!(store.len(), 3);
        }

        #[test]
        fn delete_present_removes_only_match(pick in 0usize..3) {
            let mut store = seeded_store();
            let target = store.get_all()[pick].clone();
            store.delete(target.id).unwrap();
            prop_assert_eq!(store.len(), 2);
            prop_assert!(store.get(target.id).is_none());
        }
    }
}
