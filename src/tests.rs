#[cfg(test)]
mod integration_tests {
    use crate::test_utils::test_utils::{login, login_guru, setup_admin_server, setup_test_server};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn add_kelas(server: &TestServer, kelas: &str, nama: &str) -> String {
        let response = server
            .post("/api/kelas/add-kelas")
            .json(&json!({ "kelas": kelas, "nama": nama }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["kelas"]["id"].as_str().unwrap().to_string()
    }

    async fn add_siswa(server: &TestServer, nis: &str, nama: &str, kelas: Option<(&str, &str)>) -> Value {
        let mut payload = json!({
            "nis": nis,
            "nama": nama,
            "jenisKelamin": "Laki-Laki",
            "tahunMasuk": 2024,
            "password": "siswa123",
        });
        if let Some((kelas, nama_kelas)) = kelas {
            payload["kelas"] = json!(kelas);
            payload["namaKelas"] = json!(nama_kelas);
        }
        let response = server.post("/api/siswa/add-siswa").json(&payload).await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"].clone()
    }

    async fn jumlah_siswa(server: &TestServer, kelas_id: &str) -> i64 {
        let body: Value = server
            .get(&format!("/api/kelas/get-kelas/{}", kelas_id))
            .await
            .json();
        body["kelas"]["jumlahSiswa"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (server, _state) = setup_test_server().await;
        server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_protected_routes_need_login() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/api/siswa/get-siswa").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);

        server
            .post("/api/kelas/add-kelas")
            .json(&json!({ "kelas": "7", "nama": "A" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_me_logout() {
        let (server, state) = setup_test_server().await;
        crate::test_utils::test_utils::create_account(&state.db_pool, "admin", "admin", None).await;

        server
            .post("/api/auth/login")
            .json(&json!({ "id": "admin", "password": "salah" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        login(&server, "admin").await;
        let me: Value = server.get("/api/auth/me").await.json();
        assert_eq!(me["user"]["id"], "admin");
        assert_eq!(me["user"]["role"], "admin");

        server.post("/api/auth/logout").await.assert_status_ok();
        server
            .get("/api/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guru_cannot_use_admin_routes() {
        let (server, state) = setup_test_server().await;
        login_guru(&server, &state, "guru1", None).await;

        server
            .post("/api/kelas/add-kelas")
            .json(&json!({ "kelas": "7", "nama": "A" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // read routes stay open
        server.get("/api/kelas/get-kelas").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_guru_grades_only_own_class() {
        let (server, state) = setup_admin_server().await;
        let kelas_a = add_kelas(&server, "7", "A").await;
        add_kelas(&server, "7", "B").await;
        let own = add_siswa(&server, "8001", "Ayu", Some(("7", "A"))).await;
        let other = add_siswa(&server, "8002", "Bima", Some(("7", "B"))).await;
        server
            .post("/api/ajaran/add-ajaran")
            .json(&json!({ "ajaran": "2024/2025" }))
            .await
            .assert_status_ok();
        let mapel: Value = server
            .post("/api/mapel/add-mapel")
            .json(&json!({ "kode": "IPA", "nama": "Ilmu Pengetahuan Alam" }))
            .await
            .json();

        server.post("/api/auth/logout").await.assert_status_ok();
        login_guru(&server, &state, "wali7a", Some(&kelas_a)).await;

        let grade = |siswa: &Value| {
            json!({
                "siswaId": siswa["id"],
                "mapelId": mapel["mapel"]["id"],
                "semester": "genap",
                "tahunAjaran": "2024/2025",
                "nilai": 77,
            })
        };
        server
            .post("/api/nilai/add-nilai")
            .json(&grade(&other))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .post("/api/nilai/add-nilai")
            .json(&grade(&own))
            .await
            .assert_status_ok();

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM nilai")
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_add_siswa_updates_class_count() {
        let (server, _state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "7", "A").await;

        let siswa = add_siswa(&server, "1001", "Budi", Some(("7", "A"))).await;
        assert_eq!(siswa["nis"], "1001");
        assert_eq!(siswa["kelas"]["id"], kelas_id.as_str());
        assert!(siswa.get("password").is_none());
        assert!(siswa.get("passwordHash").is_none());

        add_siswa(&server, "1002", "Ani", Some(("7", "A"))).await;
        assert_eq!(jumlah_siswa(&server, &kelas_id).await, 2);

        let detail: Value = server
            .get(&format!("/api/kelas/get-kelas/{}", kelas_id))
            .await
            .json();
        let names: Vec<&str> = detail["kelas"]["siswa"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["nama"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ani", "Budi"]);
    }

    #[tokio::test]
    async fn test_add_siswa_rejections() {
        let (server, _state) = setup_admin_server().await;
        add_kelas(&server, "7", "A").await;
        add_siswa(&server, "1001", "Budi", Some(("7", "A"))).await;

        let payload = |nis: &str, kelas: &str| {
            json!({
                "nis": nis,
                "nama": "Siti",
                "jenisKelamin": "Perempuan",
                "tahunMasuk": 2024,
                "password": "siswa123",
                "kelas": kelas,
                "namaKelas": "A",
            })
        };

        let response = server.post("/api/siswa/add-siswa").json(&payload("1001", "7")).await;
        response.assert_status(StatusCode::CONFLICT);

        let response = server.post("/api/siswa/add-siswa").json(&payload("1003", "9")).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "Kelas tidak ditemukan.");

        // neither attempt left a student behind
        let list: Value = server.get("/api/siswa/get-siswa").await.json();
        assert_eq!(list["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn test_get_siswa_pagination_and_filters() {
        let (server, _state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "8", "B").await;
        for i in 0..9 {
            let nis = format!("20{:02}", i);
            let kelas = if i % 3 == 0 { Some(("8", "B")) } else { None };
            add_siswa(&server, &nis, &format!("Murid {}", i), kelas).await;
        }

        let first: Value = server.get("/api/siswa/get-siswa").await.json();
        assert_eq!(first["success"], true);
        assert_eq!(first["data"].as_array().unwrap().len(), 7);
        assert_eq!(first["pagination"]["currentPage"], 1);
        assert_eq!(first["pagination"]["perPage"], 7);
        assert_eq!(first["pagination"]["total"], 9);
        assert_eq!(first["pagination"]["totalPages"], 2);

        let second: Value = server
            .get("/api/siswa/get-siswa")
            .add_query_param("page", "2")
            .await
            .json();
        assert_eq!(second["data"].as_array().unwrap().len(), 2);

        let in_class: Value = server
            .get("/api/siswa/get-siswa")
            .add_query_param("kelasNama", &kelas_id)
            .await
            .json();
        assert_eq!(in_class["pagination"]["total"], 3);

        let searched: Value = server
            .get("/api/siswa/get-siswa")
            .add_query_param("search", "murid 4")
            .await
            .json();
        assert_eq!(searched["pagination"]["total"], 1);

        let empty: Value = server
            .get("/api/siswa/get-siswa")
            .add_query_param("tahunMasuk", "1999")
            .await
            .json();
        assert_eq!(empty["pagination"]["total"], 0);
        assert_eq!(empty["pagination"]["totalPages"], 0);
    }

    #[tokio::test]
    async fn test_delete_siswa_keeps_class_count_consistent() {
        let (server, _state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "9", "C").await;
        let a = add_siswa(&server, "3001", "A", Some(("9", "C"))).await;
        let b = add_siswa(&server, "3002", "B", Some(("9", "C"))).await;
        let c = add_siswa(&server, "3003", "C", Some(("9", "C"))).await;
        assert_eq!(jumlah_siswa(&server, &kelas_id).await, 3);

        server
            .delete(&format!("/api/siswa/delete-siswa/{}", a["id"].as_str().unwrap()))
            .await
            .assert_status_ok();
        assert_eq!(jumlah_siswa(&server, &kelas_id).await, 2);

        server
            .delete("/api/siswa/delete-siswa/tidak-ada")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server
            .delete("/api/siswa/delete-many-siswa")
            .json(&json!({ "dataChecked": [b["id"], c["id"], "tidak-ada"] }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["deleted"], 2);
        assert_eq!(jumlah_siswa(&server, &kelas_id).await, 0);
    }

    #[tokio::test]
    async fn test_get_detail_summary() {
        let (server, _state) = setup_admin_server().await;
        add_siswa(&server, "4001", "Budi", None).await;
        server
            .post("/api/siswa/add-siswa")
            .json(&json!({
                "nis": "4002",
                "nama": "Siti",
                "jenisKelamin": "Perempuan",
                "tahunMasuk": 2023,
                "password": "siswa123",
            }))
            .await
            .assert_status_ok();

        let body: Value = server.get("/api/siswa/get-detail").await.json();
        assert_eq!(body["data"]["jumlahSiswa"], 2);
        assert_eq!(body["data"]["lk"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["pr"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_kelas_detaches_students() {
        let (server, _state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "7", "D").await;
        let siswa = add_siswa(&server, "5001", "Dewi", Some(("7", "D"))).await;

        server
            .post("/api/kelas/add-kelas")
            .json(&json!({ "kelas": "7", "nama": "D" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let body: Value = server
            .delete(&format!("/api/kelas/delete-kelas/{}", kelas_id))
            .await
            .json();
        assert_eq!(body["siswaDilepas"], 1);

        let list: Value = server.get("/api/siswa/get-siswa").await.json();
        assert_eq!(list["data"][0]["id"], siswa["id"]);
        assert!(list["data"][0]["kelas"].is_null());

        server
            .get(&format!("/api/kelas/get-kelas/{}", kelas_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ajaran_lifecycle() {
        let (server, _state) = setup_admin_server().await;

        let response = server
            .post("/api/ajaran/add-ajaran")
            .json(&json!({ "ajaran": "2024/2025" }))
            .await;
        response.assert_status_ok();
        let created: Value = response.json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        server
            .post("/api/ajaran/add-ajaran")
            .json(&json!({ "ajaran": "2024/2025" }))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .post("/api/ajaran/add-ajaran")
            .json(&json!({ "ajaran": "2024/2025/2026" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .put(&format!("/api/ajaran/edit-ajaran/{}", id))
            .json(&json!({}))
            .await
            .assert_status_ok();

        let list: Value = server.get("/api/ajaran/get-ajaran").await.json();
        let ajaran = list["ajaran"].as_array().unwrap();
        assert_eq!(ajaran.len(), 1);
        assert_eq!(ajaran[0]["isAktif"], true);

        server
            .delete(&format!("/api/ajaran/delete-ajaran/{}", id))
            .await
            .assert_status_ok();
        server
            .delete(&format!("/api/ajaran/delete-ajaran/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_guru_records_and_exports_attendance() {
        let (server, state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "7", "A").await;
        let siswa = add_siswa(&server, "6001", "Rina", Some(("7", "A"))).await;
        let other_kelas = add_kelas(&server, "7", "B").await;

        server.post("/api/auth/logout").await.assert_status_ok();
        login_guru(&server, &state, "wali7a", Some(&kelas_id)).await;

        server
            .post("/api/absen/add-absen")
            .json(&json!({
                "tanggal": "2024-05-02",
                "absen": [{ "siswaId": siswa["id"], "status": "sakit" }],
            }))
            .await
            .assert_status_ok();

        let rekap: Value = server
            .get("/api/absen/rekap-absen")
            .add_query_param("bulan", "5")
            .add_query_param("tahun", "2024")
            .await
            .json();
        assert_eq!(rekap["countDay"], 31);
        assert_eq!(rekap["data"]["rekap"][0]["statusPerHari"][1], "sakit");
        assert_eq!(rekap["data"]["rekap"][0]["totalSakit"], 1);

        // another class is off limits for this guru
        server
            .get("/api/absen/rekap-absen")
            .add_query_param("kelas", &other_kelas)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/api/absen/rekap-absen")
            .add_query_param("bulan", "13")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let csv = server
            .get("/api/absen/rekap-absen/export")
            .add_query_param("bulan", "5")
            .add_query_param("tahun", "2024")
            .await;
        csv.assert_status_ok();
        assert!(csv.header("content-type").to_str().unwrap().starts_with("text/csv"));
        assert!(csv
            .header("content-disposition")
            .to_str()
            .unwrap()
            .contains("absensi-7-A-2024-5.csv"));
        assert!(csv.text().contains("Rina,,S,"));

        let print = server
            .get("/api/absen/rekap-absen/print")
            .add_query_param("bulan", "5")
            .add_query_param("tahun", "2024")
            .await;
        print.assert_status_ok();
        assert!(print.text().contains("Absensi Kelas 7 A Mei 2024"));
    }

    #[tokio::test]
    async fn test_grades_recap_and_export() {
        let (server, _state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "8", "A").await;
        let siswa = add_siswa(&server, "7001", "Tono", Some(("8", "A"))).await;
        server
            .post("/api/ajaran/add-ajaran")
            .json(&json!({ "ajaran": "2024/2025" }))
            .await
            .assert_status_ok();
        let mapel: Value = server
            .post("/api/mapel/add-mapel")
            .json(&json!({ "kode": "mtk", "nama": "Matematika" }))
            .await
            .json();
        assert_eq!(mapel["mapel"]["kode"], "MTK");

        let grade = |nilai: i64| {
            json!({
                "siswaId": siswa["id"],
                "mapelId": mapel["mapel"]["id"],
                "semester": "ganjil",
                "tahunAjaran": "2024/2025",
                "nilai": nilai,
            })
        };
        server.post("/api/nilai/add-nilai").json(&grade(150)).await.assert_status(StatusCode::BAD_REQUEST);
        server.post("/api/nilai/add-nilai").json(&grade(88)).await.assert_status_ok();

        let rekap: Value = server
            .get("/api/nilai/rekap-nilai")
            .add_query_param("kelas", &kelas_id)
            .add_query_param("semester", "ganjil")
            .add_query_param("tahunAjaran", "2024/2025")
            .await
            .json();
        assert_eq!(rekap["mapel"], json!(["MTK"]));
        assert_eq!(rekap["data"]["nilai"][0]["nilai"], 88);

        // admins must name the class
        server
            .get("/api/nilai/rekap-nilai")
            .add_query_param("semester", "ganjil")
            .add_query_param("tahunAjaran", "2024/2025")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let csv = server
            .get("/api/nilai/rekap-nilai/export")
            .add_query_param("kelas", &kelas_id)
            .add_query_param("semester", "ganjil")
            .add_query_param("tahunAjaran", "2024/2025")
            .await;
        csv.assert_status_ok();
        assert!(csv.text().contains("7001,Tono,88,88.00"));

        let print = server
            .get("/api/nilai/rekap-nilai/print")
            .add_query_param("kelas", &kelas_id)
            .add_query_param("semester", "ganjil")
            .add_query_param("tahunAjaran", "2024/2025")
            .await;
        print.assert_status_ok();
        assert!(print.text().contains("Tono"));
    }

    #[tokio::test]
    async fn test_admin_adds_guru() {
        let (server, _state) = setup_admin_server().await;
        let kelas_id = add_kelas(&server, "7", "A").await;

        server
            .post("/api/user/add-guru")
            .json(&json!({ "id": "guru2", "nama": "Bu Sari", "password": "guru1234", "waliKelas": kelas_id }))
            .await
            .assert_status_ok();
        server
            .post("/api/user/add-guru")
            .json(&json!({ "id": "guru3", "nama": "Pak Joko", "password": "guru1234", "waliKelas": "tidak-ada" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server.post("/api/auth/logout").await.assert_status_ok();
        server
            .post("/api/auth/login")
            .json(&json!({ "id": "guru2", "password": "guru1234" }))
            .await
            .assert_status_ok();
        let me: Value = server.get("/api/auth/me").await.json();
        assert_eq!(me["user"]["waliKelas"]["id"], kelas_id.as_str());
    }
}
