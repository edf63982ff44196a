// External collaborator boundaries: icon storage, favicon lookup

pub mod favicon;
pub mod icon_storage;
