use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Username of the owner that every task is assigned to until real accounts exist.
const DEFAULT_OWNER_USERNAME: &str = "default";
const DEFAULT_OWNER_EMAIL: &str = "default@localhost";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No usable password: the hash is empty, so nothing can ever match it.
        let insert = Query::insert()
            .into_table(Users::Table)
            .columns([Users::Username, Users::Email, Users::HashedPassword])
            .values_panic([
                DEFAULT_OWNER_USERNAME.into(),
                DEFAULT_OWNER_EMAIL.into(),
                "".into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Username).eq(DEFAULT_OWNER_USERNAME))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Username,
    Email,
    HashedPassword,
}
