// 🌐 Localization - String lookup and rupiah formatting
//
// Lookups never fail: an unknown key is returned unchanged so a missing
// translation shows up as its key instead of an empty label.

use crate::settings::Language;

const ID: &[(&str, &str)] = &[
    ("app_title", "Administrasi SPP"),
    ("nav_dashboard", "Dasbor"),
    ("nav_students", "Data Siswa"),
    ("nav_transactions", "Transaksi"),
    ("stat_total_collected", "Total Terkumpul"),
    ("stat_total_transactions", "Total Transaksi"),
    ("stat_monthly_target", "Target Bulan Ini"),
    ("stat_collected_month", "SPP Terkumpul"),
    ("stat_paid_count", "Siswa Lunas"),
    ("chart_title", "Komposisi Pembayaran"),
    ("chart_empty", "Belum ada transaksi"),
    ("th_id", "ID"),
    ("th_nis", "NIS"),
    ("th_name", "Nama"),
    ("th_class", "Kelas"),
    ("th_student", "Siswa"),
    ("th_type", "Jenis"),
    ("th_date", "Tanggal"),
    ("th_amount", "Jumlah"),
    ("th_status", "Status"),
    ("label_month_bill", "Bulan Tagihan"),
    ("label_year_bill", "Tahun Tagihan"),
    ("alert_delete_confirm", "Yakin ingin menghapus data siswa ini?"),
    ("alert_import_success", "Berhasil mengimpor"),
    ("alert_export_success", "Laporan disimpan ke"),
    ("alert_payment_saved", "Pembayaran tersimpan"),
    ("alert_profile_saved", "Profil berhasil disimpan!"),
    ("alert_pass_mismatch", "Konfirmasi password tidak cocok!"),
    ("alert_pass_saved", "Password berhasil diubah!"),
    ("hint_confirm", "Tekan y untuk ya, n untuk batal"),
];

const EN: &[(&str, &str)] = &[
    ("app_title", "Tuition Admin"),
    ("nav_dashboard", "Dashboard"),
    ("nav_students", "Students"),
    ("nav_transactions", "Transactions"),
    ("stat_total_collected", "Total Collected"),
    ("stat_total_transactions", "Total Transactions"),
    ("stat_monthly_target", "Monthly Target"),
    ("stat_collected_month", "Tuition Collected"),
    ("stat_paid_count", "Students Paid"),
    ("chart_title", "Payment Breakdown"),
    ("chart_empty", "No transactions yet"),
    ("th_id", "ID"),
    ("th_nis", "NIS"),
    ("th_name", "Name"),
    ("th_class", "Class"),
    ("th_student", "Student"),
    ("th_type", "Type"),
    ("th_date", "Date"),
    ("th_amount", "Amount"),
    ("th_status", "Status"),
    ("label_month_bill", "Billing Month"),
    ("label_year_bill", "Billing Year"),
    ("alert_delete_confirm", "Are you sure you want to delete this student?"),
    ("alert_import_success", "Successfully imported"),
    ("alert_export_success", "Report saved to"),
    ("alert_payment_saved", "Payment saved"),
    ("alert_profile_saved", "Profile saved!"),
    ("alert_pass_mismatch", "Password confirmation does not match!"),
    ("alert_pass_saved", "Password changed!"),
    ("hint_confirm", "Press y to confirm, n to cancel"),
];

/// Look up `key` for `language`, returning the key itself when missing.
pub fn t<'a>(language: Language, key: &'a str) -> &'a str {
    let table = match language {
        Language::Id => ID,
        Language::En => EN,
    };

    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(key)
}

/// Format whole rupiah the way id-ID currency formatting does: `Rp 1.250.000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("Rp {}", grouped)
}
