//! End-to-end scenarios over the scripted vendor link and an embedded
//! database file.

#[cfg(test)]
mod util;

#[cfg(test)]
mod test_backfill;

#[cfg(test)]
mod test_monitor;

#[cfg(test)]
mod test_writer;

#[cfg(test)]
mod test_quoting;
