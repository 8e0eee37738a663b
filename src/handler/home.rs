//! Fixed greeting handler

use hyper::body::Bytes;
use hyper::Request;

use super::write_body;
use crate::error::Result;
use crate::http::ResponseWriter;

pub const HOME_GREETING: &str = "Hello night owl.....this text is from home route!!!";

pub fn home(w: &mut dyn ResponseWriter, _req: &Request<Bytes>) -> Result<()> {
    write_body(w, HOME_GREETING.as_bytes());
    Ok(())
}
