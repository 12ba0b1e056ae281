use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    Frequency,
    FrequencyValue,
    LastDone,
    NextToDo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
struct FrequencyType;

#[derive(DeriveIden)]
enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Other,
}

const DEFAULT_FREQUENCY: &str = "monthly";
const RECURRENCE_CHECK: &str = "(frequency = 'other') = (frequency_value IS NOT NULL) \
     AND (frequency_value IS NULL OR frequency_value > 0)";
const FK_TASKS_TO_USERS: &str = "fk-tasks-owner_id";
const IDX_TASKS_NAME: &str = "idx-tasks-name";
const IDX_TASKS_OWNER_ID: &str = "idx-tasks-owner_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(FrequencyType)
                    .values([
                        Frequency::Daily,
                        Frequency::Weekly,
                        Frequency::Monthly,
                        Frequency::Yearly,
                        Frequency::Other,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::Name).string().not_null())
                    .col(ColumnDef::new(Tasks::Description).text().null())
                    .col(ColumnDef::new(Tasks::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Tasks::Frequency)
                            .custom(FrequencyType)
                            .not_null()
                            .default(DEFAULT_FREQUENCY),
                    )
                    .col(ColumnDef::new(Tasks::FrequencyValue).integer().null())
                    .col(ColumnDef::new(Tasks::LastDone).date().null())
                    .col(ColumnDef::new(Tasks::NextToDo).date().null())
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::cust(RECURRENCE_CHECK))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TASKS_TO_USERS)
                            .from(Tasks::Table, Tasks::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASKS_NAME)
                    .table(Tasks::Table)
                    .col(Tasks::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASKS_OWNER_ID)
                    .table(Tasks::Table)
                    .col(Tasks::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dropping the table also drops its indexes and foreign key.
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(FrequencyType).to_owned())
            .await
    }
}
