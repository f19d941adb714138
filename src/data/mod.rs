//! Data layer: decoding CSV payloads and shaping them into chart series.
//!
//! | Module          | Responsibility |
//! | --------------- | -------------- |
//! | [`frame`]       | Splitting a text body into rows of nullable cells |
//! | [`series`]      | Removing the metadata row and projecting columns into named series |
//! | [`ohlc`]        | Mapping rows to open/high/low/close candles |
//! | [`variant`]     | Static layouts of the three chart variants |
//! | [`axis_format`] | Tick and title formatting |

pub mod axis_format;
pub mod frame;
pub mod ohlc;
pub mod series;
pub mod variant;
