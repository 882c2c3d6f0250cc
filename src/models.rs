use serde::{Deserialize, Serialize};

/// One expense entry. Field names are the persisted JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub memo: String,
    pub amount: f64,
}

/// Raw form input as typed by the user, before validation.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub date: String,
    pub category: String,
    pub memo: String,
    pub amount: String,
}

impl EntryForm {
    pub fn new(date: &str, category: &str, memo: &str, amount: &str) -> Self {
        Self {
            date: date.to_string(),
            category: category.to_string(),
            memo: memo.to_string(),
            amount: amount.to_string(),
        }
    }
}

/// Validated, trimmed fields waiting for an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: String,
    pub category: String,
    pub memo: String,
    pub amount: f64,
}

impl ExpenseDraft {
    pub fn into_record(self, id: i64) -> ExpenseRecord {
        ExpenseRecord {
            id,
            date: self.date,
            category: self.category,
            memo: self.memo,
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_layout() {
        let record = ExpenseRecord {
            id: 7,
            date: "2024-01-01".to_string(),
            category: "Food".to_string(),
            memo: "lunch".to_string(),
            amount: 1000.0,
        };
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert_eq!(obj["id"], 7);
        assert_eq!(obj["category"], "Food");
        assert_eq!(obj["amount"].as_f64(), Some(1000.0));
    }

    #[test]
    fn test_reads_browser_written_records() {
        // JSON.stringify writes whole amounts without a fraction
        let json = r#"[{"id":1704067200000,"date":"2024-01-01","category":"Food","memo":"lunch","amount":1000}]"#;
        let records: Vec<ExpenseRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].id, 1704067200000);
        assert_eq!(records[0].amount, 1000.0);
    }
}
