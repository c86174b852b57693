// 💸 Transaction Entity - One payment recorded against a student
//
// Transactions are immutable once created. The student reference is only
// checked at creation time, so deleting a student leaves a dangling id that
// display/export code resolves to a placeholder name.

use super::student::StudentId;
use serde::{Deserialize, Serialize};

pub type TransactionId = u64;

/// Sentinel used for month/year on anything that is not monthly tuition.
pub const NOT_APPLICABLE: &str = "-";

pub const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

// ============================================================================
// PAYMENT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentType {
    /// Monthly tuition (Sumbangan Pembinaan Pendidikan) - the recurring category
    #[default]
    #[serde(rename = "SPP")]
    Spp,

    #[serde(rename = "Uang Gedung")]
    BuildingFund,

    /// Student worksheets (Lembar Kerja Siswa)
    #[serde(rename = "LKS")]
    Materials,

    #[serde(rename = "Seragam")]
    Uniform,

    #[serde(rename = "Infaq")]
    Charity,

    #[serde(rename = "Lainnya")]
    Other,
}

impl PaymentType {
    pub const ALL: [PaymentType; 6] = [
        PaymentType::Spp,
        PaymentType::BuildingFund,
        PaymentType::Materials,
        PaymentType::Uniform,
        PaymentType::Charity,
        PaymentType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Spp => "SPP",
            PaymentType::BuildingFund => "Uang Gedung",
            PaymentType::Materials => "LKS",
            PaymentType::Uniform => "Seragam",
            PaymentType::Charity => "Infaq",
            PaymentType::Other => "Lainnya",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Only monthly tuition carries a billing month and year.
    pub fn is_recurring(&self) -> bool {
        *self == PaymentType::Spp
    }
}

// ============================================================================
// PAYMENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Lunas")]
    Paid,

    #[serde(rename = "Cicilan 1")]
    Installment1,

    #[serde(rename = "Cicilan 2")]
    Installment2,

    #[serde(rename = "Belum Lunas")]
    Unpaid,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Paid,
        PaymentStatus::Installment1,
        PaymentStatus::Installment2,
        PaymentStatus::Unpaid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Lunas",
            PaymentStatus::Installment1 => "Cicilan 1",
            PaymentStatus::Installment2 => "Cicilan 2",
            PaymentStatus::Unpaid => "Belum Lunas",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

// ============================================================================
// TRANSACTION ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    /// Student this payment was recorded for (may no longer exist)
    pub student_id: StudentId,

    #[serde(rename = "type")]
    pub payment_type: PaymentType,

    /// Billing month name for SPP, `"-"` otherwise
    pub month: String,

    /// Billing year for SPP, `"-"` otherwise
    pub year: String,

    /// Smallest currency unit (whole rupiah)
    pub amount: u64,

    /// Payment date, `YYYY-MM-DD`
    pub date: String,

    pub status: PaymentStatus,
}

/// A payment as entered by the user, before the tracker assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub student_id: StudentId,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub month: String,
    pub year: String,
    pub amount: u64,
    pub date: String,
    pub status: PaymentStatus,
}

impl NewTransaction {
    /// Turn the draft into a stored transaction. Month and year are replaced
    /// by the sentinel unless the payment is monthly tuition.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        let (month, year) = if self.payment_type.is_recurring() {
            (self.month, self.year)
        } else {
            (NOT_APPLICABLE.to_string(), NOT_APPLICABLE.to_string())
        };

        Transaction {
            id,
            student_id: self.student_id,
            payment_type: self.payment_type,
            month,
            year,
            amount: self.amount,
            date: self.date,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(payment_type: PaymentType) -> NewTransaction {
        NewTransaction {
            student_id: 1,
            payment_type,
            month: "Maret".to_string(),
            year: "2024".to_string(),
            amount: 150_000,
            date: "2024-03-02".to_string(),
            status: PaymentStatus::Paid,
        }
    }

    #[test]
    fn test_spp_keeps_billing_period() {
        let tx = draft(PaymentType::Spp).into_transaction(7);
        assert_eq!(tx.id, 7);
        assert_eq!(tx.month, "Maret");
        assert_eq!(tx.year, "2024");
    }

    #[test]
    fn test_one_time_fee_uses_sentinel() {
        let tx = draft(PaymentType::Uniform).into_transaction(8);
        assert_eq!(tx.month, NOT_APPLICABLE);
        assert_eq!(tx.year, NOT_APPLICABLE);
        assert_eq!(tx.amount, 150_000);
    }

    #[test]
    fn test_type_labels() {
        assert_eq!(PaymentType::BuildingFund.label(), "Uang Gedung");
        assert_eq!(PaymentType::from_label("LKS"), Some(PaymentType::Materials));
        assert_eq!(PaymentType::from_label("spp"), None);
        assert!(PaymentType::Spp.is_recurring());
        assert!(!PaymentType::Charity.is_recurring());
    }

    #[test]
    fn test_status_labels_round_trip() {
        for status in PaymentStatus::ALL {
            assert_eq!(PaymentStatus::from_label(status.label()), Some(status));
        }
    }

    #[test]
    fn test_transaction_json_field_names() {
        let tx = draft(PaymentType::Spp).into_transaction(101);
        let value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["studentId"], 1);
        assert_eq!(value["type"], "SPP");
        assert_eq!(value["status"], "Lunas");
    }

    #[test]
    fn test_months_calendar() {
        assert_eq!(MONTHS.len(), 12);
        assert_eq!(MONTHS[0], "Januari");
        assert_eq!(MONTHS[11], "Desember");
    }
}
