//! Create `testimonial` table; rating is constrained to 1..=5 at the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Testimonial::Table)
                    .if_not_exists()
                    .col(uuid(Testimonial::Id).primary_key())
                    .col(string_len(Testimonial::Name, 128).not_null())
                    .col(string_len(Testimonial::EventType, 64).not_null())
                    .col(integer(Testimonial::Rating).not_null())
                    .col(text(Testimonial::Testimonial).not_null())
                    .col(boolean(Testimonial::IsApproved).not_null().default(false))
                    .col(boolean(Testimonial::IsFeatured).not_null().default(false))
                    .col(json_binary(Testimonial::Images).not_null())
                    .col(timestamp_with_time_zone(Testimonial::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Testimonial::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Testimonial::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Testimonial {
    Table,
    Id,
    Name,
    EventType,
    Rating,
    Testimonial,
    IsApproved,
    IsFeatured,
    Images,
    CreatedAt,
    UpdatedAt,
}
