use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum RulesProfiles {
    Table,
    IsDefault,
}

#[derive(Iden, Clone, Copy)]
pub enum Events {
    Table,
    ComponentUuid,
}
