// src/services/siswa_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::Pagination,
        siswa::{
            JenisKelamin, NewSiswa, SiswaFilter, SiswaKelasRef, SiswaQuery, SiswaResponse,
            SiswaRow, SiswaSummary,
        },
    },
    services::kelas_service,
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const SISWA_SELECT: &str = r#"
    SELECT s.id, s.nis, s.nama, s.jenis_kelamin, s.tahun_masuk, s.foto, s.kelas_id,
           s.created_at, k.kelas AS kelas_kelas, k.nama AS kelas_nama
    FROM siswa s
    LEFT JOIN kelas k ON k.id = s.kelas_id
"#;

impl SiswaQuery {
    /// Normalizes the raw query string: blank values are dropped, `tahunMasuk` must be a year.
    pub fn to_filter(&self) -> AppResult<SiswaFilter> {
        fn non_blank(v: &Option<String>) -> Option<String> {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        let tahun_masuk = match non_blank(&self.tahun_masuk) {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| AppError::BadRequest("tahunMasuk tidak valid.".into()))?,
            ),
            None => None,
        };

        Ok(SiswaFilter {
            search: non_blank(&self.search),
            tahun_masuk,
            jenis_kelamin: non_blank(&self.jenis_kelamin),
            kelas_id: non_blank(&self.kelas_nama),
        })
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_params(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Escapes LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &SiswaFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(search) = &filter.search {
        // LIKE is case-insensitive for ASCII in SQLite
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (s.nama LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR s.nis LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(tahun) = filter.tahun_masuk {
        qb.push(" AND s.tahun_masuk = ").push_bind(tahun);
    }
    if let Some(jk) = &filter.jenis_kelamin {
        qb.push(" AND s.jenis_kelamin = ").push_bind(jk.clone());
    }
    if let Some(kelas_id) = &filter.kelas_id {
        qb.push(" AND s.kelas_id = ").push_bind(kelas_id.clone());
    }
}

/// One page of students, newest first, plus the total number of matches.
/// `search` is a case-insensitive literal substring match on name or NIS; regex patterns are not interpreted.
pub async fn find_siswa_page(
    db_pool: &SqlitePool,
    filter: &SiswaFilter,
    pagination: Pagination,
) -> AppResult<(Vec<SiswaResponse>, i64)> {
    tracing::debug!("Listing students: {:?} {:?}", filter, pagination);

    let mut qb = QueryBuilder::<Sqlite>::new(SISWA_SELECT);
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY s.created_at DESC, s.rowid DESC LIMIT ")
        .push_bind(pagination.limit)
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let siswa = qb
        .build_query_as::<SiswaRow>()
        .fetch_all(db_pool)
        .await?
        .into_iter()
        .map(SiswaResponse::from)
        .collect();

    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM siswa s");
    push_filters(&mut count_qb, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(db_pool).await?;

    Ok((siswa, total))
}

/// Registers a student and, when a class selector is given, enrolls them in that class.
/// Everything happens in one transaction: a failed lookup or duplicate NIS writes nothing.
pub async fn create_siswa(db_pool: &SqlitePool, new: NewSiswa) -> AppResult<SiswaResponse> {
    tracing::info!("Registering student NIS {}", new.nis);
    let mut tx = db_pool.begin().await?;

    let nis_taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM siswa WHERE nis = ?1")
        .bind(&new.nis)
        .fetch_one(&mut *tx)
        .await?
        > 0;
    if nis_taken {
        return Err(AppError::Duplicate("NIS sudah digunakan.".into()));
    }

    let kelas = match &new.kelas {
        Some(selector) => Some(
            kelas_service::find_kelas_by_selector(&mut tx, selector)
                .await?
                .ok_or_else(|| AppError::NotFound("Kelas tidak ditemukan.".into()))?,
        ),
        None => None,
    };

    // The student row goes in first: membership needs its id
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO siswa (id, nis, nama, jenis_kelamin, tahun_masuk, password_hash, foto, kelas_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&id)
    .bind(&new.nis)
    .bind(&new.nama)
    .bind(new.jenis_kelamin)
    .bind(new.tahun_masuk)
    .bind(&new.password_hash)
    .bind(&new.foto)
    .bind(kelas.as_ref().map(|k| k.id.clone()))
    .bind(created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::from_insert(e, "NIS sudah digunakan."))?;

    if let Some(k) = &kelas {
        let jumlah = kelas_service::add_member(&mut tx, &k.id, &id).await?;
        tracing::debug!("Student {} added to class {} ({} members).", id, k.id, jumlah);
    }

    tx.commit().await?;
    tracing::info!("✅ Student '{}' registered.", new.nis);

    Ok(SiswaResponse {
        id,
        nis: new.nis,
        nama: new.nama,
        jenis_kelamin: new.jenis_kelamin,
        tahun_masuk: new.tahun_masuk,
        foto: new.foto,
        kelas: kelas.as_ref().map(Into::into),
        created_at,
    })
}

/// Deletes one student and pulls them out of their class.
pub async fn delete_siswa(db_pool: &SqlitePool, siswa_id: &str) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let siswa = sqlx::query_as::<_, SiswaKelasRef>("SELECT id, kelas_id FROM siswa WHERE id = ?1")
        .bind(siswa_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan.".into()))?;

    if let Some(kelas_id) = &siswa.kelas_id {
        if kelas_service::remove_member(&mut tx, kelas_id, &siswa.id)
            .await?
            .is_none()
        {
            tracing::warn!(
                "Student '{}' referenced missing class '{}'; skipping class update.",
                siswa.id,
                kelas_id
            );
        }
    }

    sqlx::query("DELETE FROM siswa WHERE id = ?1")
        .bind(&siswa.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!("✅ Student '{}' deleted.", siswa_id);
    Ok(())
}

/// Bulk delete. Unknown ids are ignored; returns how many students were removed.
pub async fn delete_many_siswa(db_pool: &SqlitePool, ids: &[String]) -> AppResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut tx = db_pool.begin().await?;

    // Read class references before the rows disappear
    let mut select = QueryBuilder::<Sqlite>::new("SELECT id, kelas_id FROM siswa WHERE id IN (");
    let mut sep = select.separated(", ");
    for id in ids {
        sep.push_bind(id.clone());
    }
    sep.push_unseparated(")");
    let targets = select
        .build_query_as::<SiswaKelasRef>()
        .fetch_all(&mut *tx)
        .await?;

    let mut delete = QueryBuilder::<Sqlite>::new("DELETE FROM siswa WHERE id IN (");
    let mut sep = delete.separated(", ");
    for id in ids {
        sep.push_bind(id.clone());
    }
    sep.push_unseparated(")");
    let deleted = delete.build().execute(&mut *tx).await?.rows_affected();

    // One pull + recount per deleted student; each is idempotent so shared classes converge
    for siswa in &targets {
        if let Some(kelas_id) = &siswa.kelas_id {
            if kelas_service::remove_member(&mut tx, kelas_id, &siswa.id)
                .await?
                .is_none()
            {
                tracing::warn!(
                    "Student '{}' referenced missing class '{}'; skipping class update.",
                    siswa.id,
                    kelas_id
                );
            }
        }
    }

    tx.commit().await?;
    tracing::info!("✅ {} students deleted ({} ids requested).", deleted, ids.len());
    Ok(deleted)
}

pub async fn siswa_summary(db_pool: &SqlitePool) -> AppResult<SiswaSummary> {
    let rows = sqlx::query_as::<_, SiswaRow>(&format!(
        "{} ORDER BY s.nama ASC",
        SISWA_SELECT
    ))
    .fetch_all(db_pool)
    .await?;

    let jumlah_siswa = rows.len() as i64;
    let (lk, pr): (Vec<SiswaRow>, Vec<SiswaRow>) = rows
        .into_iter()
        .partition(|s| s.jenis_kelamin == JenisKelamin::LakiLaki);

    Ok(SiswaSummary {
        jumlah_siswa,
        lk: lk.into_iter().map(SiswaResponse::from).collect(),
        pr: pr.into_iter().map(SiswaResponse::from).collect(),
    })
}
