pub mod banner;
pub mod guestbook;
