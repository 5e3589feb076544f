mod artist_name;
mod contact_email;
mod signup_record;

pub use artist_name::ArtistName;
pub use contact_email::ContactEmail;
pub use signup_record::SignupRecord;
