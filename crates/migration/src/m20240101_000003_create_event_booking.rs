//! Create `event_booking` table for public booking submissions.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventBooking::Table)
                    .if_not_exists()
                    .col(uuid(EventBooking::Id).primary_key())
                    .col(string_len(EventBooking::Name, 128).not_null())
                    .col(ColumnDef::new(EventBooking::Mobile).string_len(32).null())
                    .col(string_len(EventBooking::Email, 255).not_null())
                    .col(string_len(EventBooking::EventType, 64).not_null())
                    .col(date(EventBooking::EventDate).not_null())
                    .col(ColumnDef::new(EventBooking::Venue).string_len(255).null())
                    .col(ColumnDef::new(EventBooking::GuestCount).integer().null())
                    .col(ColumnDef::new(EventBooking::Budget).string_len(64).null())
                    .col(ColumnDef::new(EventBooking::AdditionalInfo).text().null())
                    .col(string_len(EventBooking::Status, 32).not_null().default("pending"))
                    .col(timestamp_with_time_zone(EventBooking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(EventBooking::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventBooking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EventBooking {
    Table,
    Id,
    Name,
    Mobile,
    Email,
    EventType,
    EventDate,
    Venue,
    GuestCount,
    Budget,
    AdditionalInfo,
    Status,
    CreatedAt,
    UpdatedAt,
}
