//! Migration: Create the customers table.
//!
//! The unique index on email is global, not scoped to live records, so a
//! soft-deleted customer's email still blocks reuse. That matches the
//! documented behavior of this API.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(
                        ColumnDef::new(Customers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::Phone).string().null())
                    .col(ColumnDef::new(Customers::Company).string().null())
                    .col(ColumnDef::new(Customers::Status).string().not_null())
                    .col(ColumnDef::new(Customers::AssignedToUserId).uuid().null())
                    .col(
                        ColumnDef::new(Customers::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_assigned_to_user")
                            .from(Customers::Table, Customers::AssignedToUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the soft-delete filter applied to every list and count
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_is_deleted")
                    .table(Customers::Table)
                    .col(Customers::IsDeleted)
                    .to_owned(),
            )
            .await?;

        // Index for the role-based assignee filter
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_assigned_to_user_id")
                    .table(Customers::Table)
                    .col(Customers::AssignedToUserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_customers_assigned_to_user_id")
                    .table(Customers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_customers_is_deleted")
                    .table(Customers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Company,
    Status,
    AssignedToUserId,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
