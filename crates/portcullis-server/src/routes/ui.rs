//! Minimal HTML shells for the admin pages.
//!
//! The dashboard proper is thin rendering over the `/api/` routes; these
//! shells carry just enough markup to log in and navigate. Everything
//! here except `/login` sits behind the gatekeeper.

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Build the page router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(shell))
        .route("/dashboard", get(shell))
        .route("/gateways", get(shell))
        .route("/customers", get(shell))
        .route("/provision", get(shell))
        .route("/login", get(login_page))
}

async fn shell() -> Html<&'static str> {
    Html(SHELL_HTML)
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

/// Shared shell for the admin pages. Data loads client-side from `/api/`.
const SHELL_HTML: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Portcullis Admin</title>
<style>
body{font-family:-apple-system,system-ui,sans-serif;background:#10141A;color:#E6EAF0;margin:0}
.nav{display:flex;gap:8px;align-items:center;padding:16px 24px;border-bottom:1px solid rgba(255,255,255,.08)}
.nav a{color:#9AA4B2;text-decoration:none;font-size:14px;font-weight:600;padding:8px 14px;border-radius:8px}
.nav a:hover{color:#E6EAF0;background:rgba(255,255,255,.05)}
.nav .logo{font-weight:800;color:#E6EAF0;margin-right:16px}
main{max-width:960px;margin:40px auto;padding:0 24px}
</style></head>
<body>
<nav class="nav">
  <span class="logo">Portcullis</span>
  <a href="/dashboard">Dashboard</a>
  <a href="/gateways">Gateways</a>
  <a href="/customers">Customers</a>
  <a href="/provision">Provision</a>
  <a href="#" onclick="fetch('/api/auth/logout',{method:'POST'}).then(()=>location='/login')">Sign out</a>
</nav>
<main id="app" data-api="/api"></main>
</body></html>
"##;

/// Login page. Posts credentials to `/api/auth/login` and follows the
/// `callbackUrl` query parameter on success.
const LOGIN_HTML: &str = r##"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Sign in &mdash; Portcullis Admin</title>
<style>
body{font-family:-apple-system,system-ui,sans-serif;background:#10141A;color:#E6EAF0;display:flex;align-items:center;justify-content:center;min-height:100vh;margin:0}
form{background:rgba(255,255,255,.04);border:1px solid rgba(255,255,255,.08);border-radius:16px;padding:32px;width:320px}
h1{font-size:18px;margin:0 0 20px}
label{display:block;font-size:13px;color:#9AA4B2;margin-bottom:4px}
input{width:100%;box-sizing:border-box;padding:10px;margin-bottom:14px;border-radius:8px;border:1px solid rgba(255,255,255,.12);background:#10141A;color:#E6EAF0}
button{width:100%;padding:11px;border:none;border-radius:8px;background:#3B82F6;color:#fff;font-weight:700;cursor:pointer}
.error{color:#F87171;font-size:13px;min-height:18px;margin-bottom:8px}
</style></head>
<body>
<form id="login">
  <h1>Sign in to Portcullis</h1>
  <div class="error" id="error"></div>
  <label for="email">Email</label>
  <input id="email" name="email" type="email" autocomplete="username" required/>
  <label for="password">Password</label>
  <input id="password" name="password" type="password" autocomplete="current-password" required/>
  <button type="submit">Sign in</button>
</form>
<script>
document.getElementById('login').addEventListener('submit', async (e) => {
  e.preventDefault();
  const res = await fetch('/api/auth/login', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({
      email: document.getElementById('email').value,
      password: document.getElementById('password').value,
    }),
  });
  if (res.ok) {
    const target = new URLSearchParams(location.search).get('callbackUrl') || '/dashboard';
    location = target.startsWith('/') ? target : '/dashboard';
  } else {
    const body = await res.json().catch(() => ({}));
    document.getElementById('error').textContent = body.message || 'Sign-in failed';
  }
});
</script>
</body></html>
"##;
