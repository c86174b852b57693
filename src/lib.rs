// Tuition Tracker - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod csv_io;
pub mod entities;
pub mod forms;
pub mod i18n;
pub mod ids;
pub mod notify;
pub mod sample_data;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use config::TrackerConfig;
pub use csv_io::{export_filename, parse_export, parse_student_rows, ExportRow};
pub use entities::{
    NewStudent, NewTransaction, PaymentStatus, PaymentType, Student, StudentId, StudentStatus,
    Transaction, TransactionId, MONTHS,
};
pub use forms::{PasswordForm, PaymentForm, Profile, StudentForm};
pub use i18n::{format_rupiah, t};
pub use ids::IdGenerator;
pub use notify::{ConsoleNotifier, Notifier, ScriptedNotifier};
pub use session::{ExportFile, Session};
pub use settings::{AppSettings, Language, SettingChange, TextSize};
pub use stats::{ChartData, ChartSlice, MonthlyStats};
pub use store::{ImportReport, Tracker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
