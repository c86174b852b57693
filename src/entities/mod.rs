// Entity Models - Students and payment Transactions
//
// Each entity has:
// - Stable numeric identity assigned by the tracker's id generator
// - Enumerated status/type fields that serialize by their display label

pub mod student;
pub mod transaction;

pub use student::{NewStudent, Student, StudentId, StudentStatus};
pub use transaction::{
    NewTransaction, PaymentStatus, PaymentType, Transaction, TransactionId, MONTHS, NOT_APPLICABLE,
};
