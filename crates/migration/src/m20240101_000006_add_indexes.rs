use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: admin listing filters on role and is_active
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_is_active")
                    .table(User::Table)
                    .col(User::IsActive)
                    .to_owned(),
            )
            .await?;

        // Bookings: admin table filters on status, sorts newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_event_booking_status")
                    .table(EventBooking::Table)
                    .col(EventBooking::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_event_booking_created_at")
                    .table(EventBooking::Table)
                    .col(EventBooking::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Contacts: status/priority filters
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_message_status")
                    .table(ContactMessage::Table)
                    .col(ContactMessage::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_message_priority")
                    .table(ContactMessage::Table)
                    .col(ContactMessage::Priority)
                    .to_owned(),
            )
            .await?;

        // Testimonials: public carousel reads approved + featured
        manager
            .create_index(
                Index::create()
                    .name("idx_testimonial_approved_featured")
                    .table(Testimonial::Table)
                    .col(Testimonial::IsApproved)
                    .col(Testimonial::IsFeatured)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_user_role",
            "idx_user_is_active",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(User::Table).to_owned())
                .await?;
        }
        for name in ["idx_event_booking_status", "idx_event_booking_created_at"] {
            manager
                .drop_index(Index::drop().name(name).table(EventBooking::Table).to_owned())
                .await?;
        }
        for name in ["idx_contact_message_status", "idx_contact_message_priority"] {
            manager
                .drop_index(Index::drop().name(name).table(ContactMessage::Table).to_owned())
                .await?;
        }
        manager
            .drop_index(
                Index::drop()
                    .name("idx_testimonial_approved_featured")
                    .table(Testimonial::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Role,
    IsActive,
}

#[derive(DeriveIden)]
enum EventBooking {
    Table,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ContactMessage {
    Table,
    Status,
    Priority,
}

#[derive(DeriveIden)]
enum Testimonial {
    Table,
    IsApproved,
    IsFeatured,
}
