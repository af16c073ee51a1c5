pub mod artwork;
pub mod files;
pub mod labels;
pub mod movies;
pub mod paths;
pub mod people;
pub mod playstate;
pub mod ratings;
pub mod remote_items;
pub mod sets;
pub mod streams;
pub mod unique_ids;
