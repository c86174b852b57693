// Sample dataset: one class of five students and their first January payments

use crate::config::TrackerConfig;
use crate::entities::{PaymentStatus, PaymentType, Student, StudentStatus, Transaction};
use crate::ids::IdGenerator;
use crate::store::Tracker;

pub fn students() -> Vec<Student> {
    vec![
        Student::new(1, "2024001", "Ahmad Muzaki", "9A", StudentStatus::Active),
        Student::new(2, "2024002", "Siti Aminah", "9A", StudentStatus::Active),
        Student::new(3, "2024003", "Budi Santoso", "9A", StudentStatus::Active),
        Student::new(4, "2024004", "Dewi Sartika", "9A", StudentStatus::Active),
        Student::new(5, "2024005", "Eko Prasetyo", "9A", StudentStatus::Active),
    ]
}

fn tx(
    id: u64,
    student_id: u64,
    payment_type: PaymentType,
    month: &str,
    year: &str,
    amount: u64,
    date: &str,
    status: PaymentStatus,
) -> Transaction {
    Transaction {
        id,
        student_id,
        payment_type,
        month: month.to_string(),
        year: year.to_string(),
        amount,
        date: date.to_string(),
        status,
    }
}

pub fn transactions() -> Vec<Transaction> {
    use PaymentStatus::*;
    use PaymentType::*;

    vec![
        tx(101, 1, Spp, "Januari", "2024", 150_000, "2024-01-10", Paid),
        tx(102, 2, Spp, "Januari", "2024", 150_000, "2024-01-11", Paid),
        tx(103, 1, Materials, "-", "-", 200_000, "2024-01-12", Paid),
        tx(104, 3, Spp, "Januari", "2024", 150_000, "2024-01-15", Paid),
        tx(105, 4, BuildingFund, "-", "-", 500_000, "2024-01-20", Installment1),
    ]
}

/// Tracker preloaded with the sample class.
pub fn tracker(config: TrackerConfig, ids: IdGenerator) -> Tracker {
    Tracker::with_data(config, ids, students(), transactions())
}
