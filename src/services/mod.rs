/*
 * Responsibility
 * - auth: session (発行/検証), bearer secret, role
 * - access: path pattern, route table, access gate
 */
pub mod access;
pub mod auth;
