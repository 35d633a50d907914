pub mod login_token_purge;
