#[cfg(test)]
pub mod test_utils {
    use crate::{
        db,
        models::{
            kelas::KelasSelector,
            siswa::{JenisKelamin, NewSiswa},
            user::{NewUser, ROLE_ADMIN, ROLE_GURU},
        },
        services::{auth_service, user_service},
        state::AppState,
        web::routes::create_router,
    };
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::SqlitePool;
    use tower_sessions::SessionManagerLayer;
    use tower_sessions_sqlx_store::SqliteStore;

    pub const TEST_PASSWORD: &str = "rahasia123";
    // Lowest cost bcrypt accepts; keeps hashing fast in tests
    pub const TEST_BCRYPT_COST: u32 = 4;

    /// In-memory SQLite database with migrations applied.
    pub async fn setup_test_db() -> SqlitePool {
        db::create_memory_pool()
            .await
            .expect("Failed to create in-memory database")
    }

    /// A student ready for `siswa_service::create_siswa`; the hash is a placeholder.
    pub fn new_siswa(nis: &str, kelas: Option<KelasSelector>) -> NewSiswa {
        NewSiswa {
            nis: nis.to_string(),
            nama: format!("Siswa {}", nis),
            jenis_kelamin: JenisKelamin::LakiLaki,
            tahun_masuk: 2024,
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholde".to_string(),
            foto: None,
            kelas,
        }
    }

    pub async fn create_account(pool: &SqlitePool, id: &str, role: &str, wali_kelas_id: Option<&str>) {
        let password_hash = auth_service::hash_password(TEST_PASSWORD, TEST_BCRYPT_COST)
            .await
            .expect("Failed to hash password");
        user_service::create_user(
            pool,
            NewUser {
                id: id.to_string(),
                nama: id.to_string(),
                role: role.to_string(),
                password_hash,
                wali_kelas_id: wali_kelas_id.map(str::to_string),
            },
        )
        .await
        .expect("Failed to create account");
    }

    /// Full router (with the session layer) over a fresh database, plus the state behind it.
    /// The server keeps cookies, so a login sticks for later requests.
    pub async fn setup_test_server() -> (TestServer, AppState) {
        let db_pool = setup_test_db().await;

        let session_store = SqliteStore::new(db_pool.clone())
            .with_table_name("sessions")
            .expect("Invalid session table name");
        session_store
            .migrate()
            .await
            .expect("Failed to create session table");
        let session_layer = SessionManagerLayer::new(session_store).with_secure(false);

        let state = AppState {
            db_pool,
            bcrypt_cost: TEST_BCRYPT_COST,
        };
        let app = create_router(state.clone()).layer(session_layer);

        let server = TestServer::builder()
            .save_cookies()
            .build(app)
            .expect("Failed to start test server");
        (server, state)
    }

    pub async fn login(server: &TestServer, id: &str) {
        server
            .post("/api/auth/login")
            .json(&json!({ "id": id, "password": TEST_PASSWORD }))
            .await
            .assert_status_ok();
    }

    /// Test server with an admin account already logged in.
    pub async fn setup_admin_server() -> (TestServer, AppState) {
        let (server, state) = setup_test_server().await;
        create_account(&state.db_pool, "admin", ROLE_ADMIN, None).await;
        login(&server, "admin").await;
        (server, state)
    }

    /// Test server with a guru (homeroom teacher of `kelas_id`) logged in.
    pub async fn login_guru(server: &TestServer, state: &AppState, id: &str, kelas_id: Option<&str>) {
        create_account(&state.db_pool, id, ROLE_GURU, kelas_id).await;
        login(server, id).await;
    }
}
