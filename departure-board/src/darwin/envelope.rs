//! SOAP request construction for `GetDepartureBoard`.

use quick_xml::escape::escape;

use crate::domain::{Crs, FetchOptions};

const SOAP_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const TOKEN_NS: &str = "http://thalesgroup.com/RTTI/2013-11-28/Token/types";
const LDB_NS: &str = "http://thalesgroup.com/RTTI/2017-10-01/ldb/";

/// Build the SOAP envelope for a departure board request.
///
/// `timeOffset` and `timeWindow` elements are only emitted when non-zero,
/// so an unset option looks exactly like one that was never requested.
pub fn departure_board_request(token: &str, crs: &Crs, options: &FetchOptions) -> String {
    let mut optional = String::new();

    if let Some(offset) = options.offset() {
        optional.push_str(&format!(
            "\n\t\t\t<ldb:timeOffset>{offset}</ldb:timeOffset>"
        ));
    }

    if let Some(window) = options.window() {
        optional.push_str(&format!(
            "\n\t\t\t<ldb:timeWindow>{window}</ldb:timeWindow>"
        ));
    }

    format!(
        r#"<soap:Envelope
	xmlns:soap="{SOAP_NS}"
	xmlns:typ="{TOKEN_NS}"
	xmlns:ldb="{LDB_NS}">
	<soap:Header>
		<typ:AccessToken>
			<typ:TokenValue>{token}</typ:TokenValue>
		</typ:AccessToken>
	</soap:Header>
	<soap:Body>
		<ldb:GetDepartureBoardRequest>
			<ldb:numRows>{rows}</ldb:numRows>
			<ldb:crs>{crs}</ldb:crs>{optional}
		</ldb:GetDepartureBoardRequest>
	</soap:Body>
</soap:Envelope>
"#,
        token = escape(token),
        rows = options.effective_rows(),
        crs = crs.as_str(),
    )
}
