/*!
 * Viewer extractor
 *
 * Public API:
 * - Viewer (FromRequestParts 実装込み)
 */

mod core;
mod types;

pub use types::Viewer;
