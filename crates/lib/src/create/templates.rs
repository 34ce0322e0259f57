//! Template content for the `kbuild create` command.

/// Skeleton page handler, written to `src/<app>.c`.
pub const SRC_TEMPLATE: &str = r#"#include <kore/kore.h>
#include <kore/http.h>

int		page(struct http_request *);

int
page(struct http_request *req)
{
	http_response(req, 200, NULL, 0);
	return (KORE_RESULT_OK);
}
"#;

/// Server configuration, written to `conf/<app>.conf`.
/// Contains {app} placeholder for substitution
pub const CONFIG_TEMPLATE: &str = r#"# Placeholder configuration

bind		127.0.0.1 8888
load		./{app}.so
tls_dhparam	dh2048.pem

domain 127.0.0.1 {
	certfile	cert/server.crt
	certkey		cert/server.key
	static	/	page
}
"#;

/// Contains {app} placeholder for substitution
pub const GITIGNORE_TEMPLATE: &str = "*.o\n.objs\n{app}.so\nassets.h\ncert\n";

pub fn render(template: &str, app: &str) -> String {
  template.replace("{app}", app)
}
