//! Create the engine's five tables: restaurants, sectors, tables,
//! reservations and idempotency_keys.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Timezone).string().not_null())
                    .col(ColumnDef::new(Restaurants::Shifts).json().not_null())
                    .col(
                        ColumnDef::new(Restaurants::DefaultDurationMinutes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Restaurants::DurationRules).json().not_null())
                    .col(ColumnDef::new(Restaurants::AdvancePolicy).json())
                    .col(ColumnDef::new(Restaurants::LargeGroupThreshold).integer())
                    .col(ColumnDef::new(Restaurants::PendingHoldTtlMinutes).big_integer())
                    .col(ColumnDef::new(Restaurants::MaxGuestsPerSlot).integer())
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sectors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sectors::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sectors::RestaurantId).string().not_null())
                    .col(ColumnDef::new(Sectors::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sectors_restaurant")
                            .from(Sectors::Table, Sectors::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tables::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tables::SectorId).string().not_null())
                    .col(ColumnDef::new(Tables::MinSize).integer().not_null())
                    .col(ColumnDef::new(Tables::MaxSize).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tables_sector")
                            .from(Tables::Table, Tables::SectorId)
                            .to(Sectors::Table, Sectors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::RestaurantId).string().not_null())
                    .col(ColumnDef::new(Reservations::SectorId).string().not_null())
                    .col(ColumnDef::new(Reservations::TableIds).json().not_null())
                    .col(ColumnDef::new(Reservations::PartySize).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::StartDateTime)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::EndDateTime).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("CONFIRMED"),
                    )
                    .col(ColumnDef::new(Reservations::ExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Reservations::CustomerName).string().not_null())
                    .col(ColumnDef::new(Reservations::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Reservations::CustomerEmail).string().not_null())
                    .col(ColumnDef::new(Reservations::Notes).string())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_restaurant")
                            .from(Reservations::Table, Reservations::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_sector")
                            .from(Reservations::Table, Reservations::SectorId)
                            .to(Sectors::Table, Sectors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_restaurant_status")
                    .table(Reservations::Table)
                    .col(Reservations::RestaurantId)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_sector")
                    .table(Reservations::Table)
                    .col(Reservations::SectorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IdempotencyKeys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdempotencyKeys::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IdempotencyKeys::StatusCode)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IdempotencyKeys::Payload).json().not_null())
                    .col(
                        ColumnDef::new(IdempotencyKeys::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdempotencyKeys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sectors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
pub enum Restaurants {
    Table,
    Id,
    Name,
    Timezone,
    Shifts,
    DefaultDurationMinutes,
    DurationRules,
    AdvancePolicy,
    LargeGroupThreshold,
    PendingHoldTtlMinutes,
    MaxGuestsPerSlot,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Sectors {
    Table,
    Id,
    RestaurantId,
    Name,
}

#[derive(Iden)]
pub enum Tables {
    Table,
    Id,
    SectorId,
    MinSize,
    MaxSize,
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    RestaurantId,
    SectorId,
    TableIds,
    PartySize,
    StartDateTime,
    EndDateTime,
    Status,
    ExpiresAt,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum IdempotencyKeys {
    Table,
    Key,
    StatusCode,
    Payload,
    CreatedAt,
}
