//! Customer service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use crm_backend::domain::{
    Customer, CustomerChanges, CustomerDetail, CustomerStatus, NewCustomer, Visibility,
};
use crm_backend::errors::AppError;
use crm_backend::infra::repositories::{MockCustomerRepository, MockUserRepository};
use crm_backend::services::{CustomerManager, CustomerService};

fn test_customer(id: Uuid, email: &str) -> Customer {
    Customer {
        id,
        name: "Acme Corp".to_string(),
        email: email.to_string(),
        phone: None,
        company: Some("Acme".to_string()),
        status: CustomerStatus::Lead,
        assigned_to_user_id: None,
        is_deleted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn detail(customer: Customer) -> CustomerDetail {
    CustomerDetail {
        customer,
        assigned_to_user: None,
    }
}

fn new_customer(email: &str, assignee: Option<Uuid>) -> NewCustomer {
    NewCustomer {
        name: "Acme Corp".to_string(),
        email: email.to_string(),
        phone: None,
        company: None,
        status: CustomerStatus::Lead,
        assigned_to_user_id: assignee,
    }
}

fn manager(customers: MockCustomerRepository, users: MockUserRepository) -> CustomerManager {
    CustomerManager::new(Arc::new(customers), Arc::new(users))
}

#[tokio::test]
async fn create_rejects_duplicate_email() {
    let existing = test_customer(Uuid::new_v4(), "taken@example.com");

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_email()
        .with(eq("taken@example.com"))
        .returning(move |_| Ok(Some(existing.clone())));

    let service = manager(customers, MockUserRepository::new());
    let result = service.create(new_customer("taken@example.com", None)).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_rejects_unknown_assignee() {
    let assignee = Uuid::new_v4();

    let mut customers = MockCustomerRepository::new();
    customers.expect_find_by_email().returning(|_| Ok(None));

    let mut users = MockUserRepository::new();
    users
        .expect_exists()
        .with(eq(assignee))
        .returning(|_| Ok(false));

    let service = manager(customers, users);
    let result = service
        .create(new_customer("new@example.com", Some(assignee)))
        .await;

    match result {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid assignedToUserId"),
        other => panic!("expected BadRequest, got {:?}", other.map(|d| d.customer.id)),
    }
}

#[tokio::test]
async fn create_inserts_when_email_is_free() {
    let created = test_customer(Uuid::new_v4(), "new@example.com");
    let returned = created.clone();

    let mut customers = MockCustomerRepository::new();
    customers.expect_find_by_email().returning(|_| Ok(None));
    customers
        .expect_create()
        .returning(move |_| Ok(detail(returned.clone())));

    let service = manager(customers, MockUserRepository::new());
    let result = service
        .create(new_customer("new@example.com", None))
        .await
        .unwrap();

    assert_eq!(result.customer.id, created.id);
    assert_eq!(result.customer.status, CustomerStatus::Lead);
}

#[tokio::test]
async fn list_pages_from_one() {
    let mut customers = MockCustomerRepository::new();
    // page 3 at 10 per page starts at offset 20
    customers
        .expect_list()
        .with(eq(Visibility::All), eq(20), eq(10))
        .returning(|_, _, _| Ok(vec![]));
    customers
        .expect_count()
        .with(eq(Visibility::All))
        .returning(|_| Ok(42));

    let service = manager(customers, MockUserRepository::new());
    let page = service.list(Visibility::All, 3, 10).await.unwrap();

    assert!(page.customers.is_empty());
    assert_eq!(page.total, 42);
}

#[tokio::test]
async fn get_missing_customer_is_not_found() {
    let mut customers = MockCustomerRepository::new();
    customers.expect_find_active_by_id().returning(|_| Ok(None));

    let service = manager(customers, MockUserRepository::new());
    let result = service.get(Uuid::new_v4()).await;

    match result {
        Err(AppError::NotFound(what)) => assert_eq!(what, "Customer"),
        other => panic!("expected NotFound, got {:?}", other.map(|d| d.customer.id)),
    }
}

#[tokio::test]
async fn update_skips_email_check_when_unchanged() {
    let id = Uuid::new_v4();
    let existing = test_customer(id, "same@example.com");
    let updated = existing.clone();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_active_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(detail(existing.clone()))));
    // No expect_find_by_email: resubmitting the current email must not
    // trip the uniqueness check against the customer's own record.
    customers
        .expect_update()
        .returning(move |_, _| Ok(detail(updated.clone())));

    let service = manager(customers, MockUserRepository::new());
    let changes = CustomerChanges {
        email: Some("same@example.com".to_string()),
        name: Some("Acme Corp International".to_string()),
        ..Default::default()
    };

    assert!(service.update(id, changes).await.is_ok());
}

#[tokio::test]
async fn update_rejects_email_taken_by_another_customer() {
    let id = Uuid::new_v4();
    let existing = test_customer(id, "old@example.com");
    let other = test_customer(Uuid::new_v4(), "taken@example.com");

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_active_by_id()
        .returning(move |_| Ok(Some(detail(existing.clone()))));
    customers
        .expect_find_by_email()
        .with(eq("taken@example.com"))
        .returning(move |_| Ok(Some(other.clone())));

    let service = manager(customers, MockUserRepository::new());
    let changes = CustomerChanges {
        email: Some("taken@example.com".to_string()),
        ..Default::default()
    };
    let result = service.update(id, changes).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_explicit_null_clears_assignee_without_user_lookup() {
    let id = Uuid::new_v4();
    let existing = test_customer(id, "c@example.com");
    let updated = existing.clone();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_active_by_id()
        .returning(move |_| Ok(Some(detail(existing.clone()))));
    customers
        .expect_update()
        .withf(|_, changes| changes.assigned_to_user_id == Some(None))
        .returning(move |_, _| Ok(detail(updated.clone())));

    // users.exists must not be called for a null assignee
    let service = manager(customers, MockUserRepository::new());
    let changes = CustomerChanges {
        assigned_to_user_id: Some(None),
        ..Default::default()
    };

    assert!(service.update(id, changes).await.is_ok());
}

#[tokio::test]
async fn assign_requires_existing_user_before_customer_lookup() {
    let assignee = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_exists()
        .with(eq(assignee))
        .returning(|_| Ok(false));

    // no customer expectations: the assignee check fails first
    let service = manager(MockCustomerRepository::new(), users);
    let result = service.assign(Uuid::new_v4(), Some(assignee)).await;

    match result {
        Err(AppError::BadRequest(msg)) => {
            assert_eq!(msg, "Invalid assignedToUserId: user not found")
        }
        other => panic!("expected BadRequest, got {:?}", other.map(|d| d.customer.id)),
    }
}

#[tokio::test]
async fn assign_missing_customer_is_not_found() {
    let mut customers = MockCustomerRepository::new();
    customers.expect_find_active_by_id().returning(|_| Ok(None));

    let service = manager(customers, MockUserRepository::new());
    let result = service.assign(Uuid::new_v4(), None).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn assign_none_clears_assignment() {
    let id = Uuid::new_v4();
    let existing = test_customer(id, "c@example.com");
    let updated = existing.clone();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_active_by_id()
        .returning(move |_| Ok(Some(detail(existing.clone()))));
    customers
        .expect_update()
        .withf(|_, changes| changes.assigned_to_user_id == Some(None))
        .returning(move |_, _| Ok(detail(updated.clone())));

    let service = manager(customers, MockUserRepository::new());
    assert!(service.assign(id, None).await.is_ok());
}
