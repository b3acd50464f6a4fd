//! Which vendor link a build carries.
//!
//! The real component is an in-process object the host OS provides; this
//! repository treats it as opaque. Builds without it get an uninhabited
//! placeholder so every command still compiles and fails with a clear
//! message instead of a linker error.

use common::config::LoaderConfig;
use common::err::LResult;

#[cfg(feature = "mock_api")]
pub type DefaultLink = session::vendor::stub::StubLink;

#[cfg(feature = "mock_api")]
pub fn make_link(_config: &LoaderConfig) -> LResult<DefaultLink> {
    Ok(session::vendor::stub::StubLink::new())
}

#[cfg(not(feature = "mock_api"))]
pub enum DefaultLink {}

#[cfg(not(feature = "mock_api"))]
impl session::vendor::VendorLink for DefaultLink {
    fn initialise(&mut self, _service_key: &str) -> i32 {
        match *self {}
    }

    fn open(
        &mut self,
        _data_spec: &str,
        _from_time: &str,
        _option: i32,
    ) -> (i32, session::vendor::OpenInfo) {
        match *self {}
    }

    fn real_time_open(&mut self, _data_spec: &str, _key: &str) -> (i32, i32) {
        match *self {}
    }

    fn status(&mut self) -> i32 {
        match *self {}
    }

    fn read_record(&mut self, _buffer_size: usize) -> session::vendor::RawRead {
        match *self {}
    }

    fn skip(&mut self) {
        match *self {}
    }

    fn file_delete(&mut self, _file_name: &str) -> i32 {
        match *self {}
    }

    fn close(&mut self) -> i32 {
        match *self {}
    }
}

#[cfg(not(feature = "mock_api"))]
pub fn make_link(_config: &LoaderConfig) -> LResult<DefaultLink> {
    Err(common::err::LoaderError::Config(String::from(
        "this build carries no vendor link; run on a host with the vendor \
         component installed, or build with --features mock_api",
    )))
}
