pub(crate) mod ranking_session;
