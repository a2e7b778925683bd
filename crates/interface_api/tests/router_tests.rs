//! Router-level tests
//!
//! These run against a lazily-connected pool: routes and serialization are
//! exercised end-to-end, and only paths that would touch the database need
//! one. Validation failures short-circuit before any query is issued.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use infra_db::{create_lazy_pool, DatabaseConfig};
use interface_api::{config::ApiConfig, create_router};

fn test_server() -> TestServer {
    let pool = create_lazy_pool(DatabaseConfig::new("postgres://localhost:1/closed"))
        .expect("lazy pool never dials");
    let app = create_router(pool, ApiConfig::default());
    TestServer::new(app).expect("router builds")
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = test_server();
    let response = server.get("/api/v1/ledgers").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_create_patient_rejects_bad_email() {
    let server = test_server();

    let response = server
        .post("/api/v1/patients")
        .json(&json!({
            "name": "Asha Rao",
            "email": "not-an-email",
            "phone": "9876543210",
            "address": "12 MG Road",
            "date_of_birth": "1990-06-15"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_bulk_delete_bills_requires_ids() {
    let server = test_server();

    let response = server
        .delete("/api/v1/bills/bulk")
        .json(&json!({ "ids": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "No bill IDs provided");
}

#[tokio::test]
async fn test_bulk_update_bills_requires_updates() {
    let server = test_server();

    let response = server
        .put("/api/v1/bills/bulk")
        .json(&json!({
            "ids": ["00000000-0000-0000-0000-000000000001"],
            "updates": {}
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "No updates provided");
}

mod receipt_rendering {
    use core_kernel::Money;
    use domain_billing::{PatientSummary, PaymentMethod};
    use interface_api::receipt::{render, ClinicInfo, ReceiptLayout};
    use rust_decimal_macros::dec;
    use test_utils::TestBillBuilder;

    #[test]
    fn test_both_layouts_render_the_same_bill() {
        let mut bill = TestBillBuilder::new().with_sequence(5).build();
        bill.record_payment(Money::new(dec!(850)), PaymentMethod::Cash, None)
            .unwrap();
        let patient = PatientSummary {
            id: bill.patient_id,
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
        };
        let clinic = ClinicInfo::default();

        let standard = render(&bill, Some(&patient), &clinic, ReceiptLayout::Standard);
        let thermal = render(&bill, Some(&patient), &clinic, ReceiptLayout::Thermal);

        for rendered in [&standard, &thermal] {
            assert!(rendered.contains("BILL-2503-0005"));
            assert!(rendered.contains("Asha Rao"));
            assert!(rendered.contains("Rs.850.00"));
        }
        assert!(standard.contains("PAYMENT RECEIPT"));
        assert!(thermal.contains("*** PAYMENT RECEIPT ***"));
    }
}
