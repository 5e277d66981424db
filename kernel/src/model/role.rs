use strum::{AsRefStr, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter, Default)]
pub enum Role {
    Admin,
    #[default]
    User,
}
