/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access (access gate), cors, http (request id / trace / limit / timeout), security_headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
