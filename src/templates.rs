// src/templates.rs
use crate::{
    models::{
        absen::{RekapAbsen, StatusAbsen},
        nilai::RekapNilai,
    },
    services::{export, nilai_service},
};
use askama::Template;

// One coloured cell of the attendance grid
pub struct AbsenCell {
    pub code: &'static str,
    pub css: &'static str,
}

pub struct AbsenPrintRow {
    pub nama: String,
    pub cells: Vec<AbsenCell>,
    pub totals: [u32; 4], // H, I, S, A
}

#[derive(Template)]
#[template(path = "rekap_absen_print.html")]
pub struct RekapAbsenPrint {
    pub title: String,
    pub days: Vec<u32>,
    pub rows: Vec<AbsenPrintRow>,
}

impl From<&RekapAbsen> for RekapAbsenPrint {
    fn from(rekap: &RekapAbsen) -> Self {
        let rows = rekap
            .rekap
            .iter()
            .map(|s| AbsenPrintRow {
                nama: s.nama.clone(),
                cells: s
                    .status_per_hari
                    .iter()
                    .map(|status| match status {
                        Some(st) => AbsenCell {
                            code: st.code(),
                            css: match st {
                                StatusAbsen::Hadir => "hadir",
                                StatusAbsen::Izin => "izin",
                                StatusAbsen::Sakit => "sakit",
                                StatusAbsen::Alpha => "alpha",
                            },
                        },
                        None => AbsenCell { code: "", css: "" },
                    })
                    .collect(),
                totals: [s.total_hadir, s.total_izin, s.total_sakit, s.total_alpha],
            })
            .collect();

        Self {
            title: export::rekap_absen_title(rekap),
            days: (1..=rekap.count_day).collect(),
            rows,
        }
    }
}

pub struct NilaiPrintRow {
    pub nis: String,
    pub nama: String,
    pub nilai: Vec<String>,
    pub rata_rata: String,
}

#[derive(Template)]
#[template(path = "rekap_nilai_print.html")]
pub struct RekapNilaiPrint {
    pub title: String,
    pub mapel: Vec<String>,
    pub rows: Vec<NilaiPrintRow>,
}

impl From<&RekapNilai> for RekapNilaiPrint {
    fn from(rekap: &RekapNilai) -> Self {
        let rows = nilai_service::nilai_sheet(rekap)
            .into_iter()
            .map(|r| NilaiPrintRow {
                nis: r.nis,
                nama: r.nama,
                nilai: r
                    .nilai
                    .iter()
                    .map(|n| n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()))
                    .collect(),
                rata_rata: r
                    .rata_rata
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        Self {
            title: export::rekap_nilai_title(rekap),
            mapel: rekap.mapel.clone(),
            rows,
        }
    }
}
