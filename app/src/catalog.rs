//! Static catalog: job openings, partner companies and certificates.
//!
//! The data is bundled with the application. Lists still go through a
//! loading phase (a [`Effect::Delay`] of `CatalogEnvironment::delay`) so the
//! screens behave like the remote course listing.

use chrono::NaiveDate;
use ecolesson_core::effect::Effect;
use ecolesson_core::reducer::Reducer;
use ecolesson_core::{smallvec, SmallVec};
use serde::Serialize;
use std::time::Duration;

/// A job opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Id.
    pub id: u32,
    /// Position title.
    pub title: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Monthly salary in whole reais.
    pub salary: u32,
    /// Name of the hiring company.
    pub company: &'static str,
}

impl Job {
    /// Salary formatted as Brazilian currency.
    #[must_use]
    pub fn salary_label(&self) -> String {
        format_brl(self.salary)
    }

    /// Text of the confirmation dialog.
    #[must_use]
    pub fn confirmation(&self) -> String {
        format!("Você deseja se candidatar para a vaga \"{}\"?", self.title)
    }
}

/// A partner company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Company {
    /// Id.
    pub id: u32,
    /// Trade name.
    pub name: &'static str,
    /// Registered legal name.
    pub legal_name: &'static str,
    /// CNPJ registration number, formatted.
    pub cnpj: &'static str,
    /// Short description.
    pub description: &'static str,
}

/// A course completion certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Certificate {
    /// Id.
    pub id: u32,
    /// Name of the completed course.
    pub course_name: &'static str,
    /// Issue date, ISO 8601 (`YYYY-MM-DD`).
    pub issued_on: &'static str,
    /// Code used to validate the certificate.
    pub validation_code: &'static str,
}

impl Certificate {
    /// Issue date as `dd/mm/yyyy`; the raw value if it does not parse.
    #[must_use]
    pub fn issued_on_label(&self) -> String {
        NaiveDate::parse_from_str(self.issued_on, "%Y-%m-%d")
            .map_or_else(|_| self.issued_on.to_string(), |date| date.format("%d/%m/%Y").to_string())
    }

    /// Text of the confirmation dialog.
    #[must_use]
    pub fn confirmation(&self) -> String {
        format!("Deseja baixar o certificado do curso \"{}\"?", self.course_name)
    }
}

/// Job openings.
pub static JOBS: [Job; 7] = [
    Job {
        id: 1,
        title: "Desenvolvedor Full Stack Júnior",
        description: "Oportunidade para desenvolvedor iniciante ajudar projetos sociais com tecnologia. Buscamos profissional com conhecimento em React, Node.js e banco de dados. Trabalho remoto com horário flexível.",
        salary: 3500,
        company: "Tech Solutions",
    },
    Job {
        id: 2,
        title: "Analista de Energia Renovável",
        description: "Oportunidade para analista com conhecimento em energia solar e eólica. Ajudar comunidades com projetos sustentáveis. Experiência inicial aceita.",
        salary: 4200,
        company: "Green Energy Corp",
    },
    Job {
        id: 3,
        title: "Engenheiro de Eficiência Energética",
        description: "Oportunidade para engenheiro ajudar na otimização de consumo energético em comunidades. Experiência em auditorias energéticas desejável.",
        salary: 6800,
        company: "EcoTech Industries",
    },
    Job {
        id: 4,
        title: "Especialista em Gestão de Resíduos",
        description: "Oportunidade para especialista em gestão sustentável de resíduos. Ajudar comunidades com reciclagem e economia circular.",
        salary: 4500,
        company: "Sustentabilidade Plus",
    },
    Job {
        id: 5,
        title: "Consultor em Sustentabilidade",
        description: "Oportunidade para consultoria em práticas sustentáveis para ONGs e projetos sociais. Trabalho híbrido com flexibilidade.",
        salary: 5500,
        company: "EcoConsult",
    },
    Job {
        id: 6,
        title: "Assistente de Projetos Ambientais",
        description: "Vaga para assistente apoiar projetos ambientais e sociais. Ideal para quem está começando na área de sustentabilidade.",
        salary: 2400,
        company: "EcoTech Industries",
    },
    Job {
        id: 7,
        title: "Técnico em Energia Solar",
        description: "Oportunidade para técnico com conhecimento em instalação e manutenção de sistemas fotovoltaicos. Trabalho em campo.",
        salary: 3800,
        company: "Green Energy Corp",
    },
];

/// Partner companies.
pub static COMPANIES: [Company; 5] = [
    Company {
        id: 1,
        name: "Tech Solutions",
        legal_name: "Tech Solutions Tecnologia Ltda",
        cnpj: "12.345.678/0001-90",
        description: "Empresa líder em soluções tecnológicas sustentáveis, focada em inovação e responsabilidade ambiental.",
    },
    Company {
        id: 2,
        name: "Green Energy Corp",
        legal_name: "Green Energy Corporation S.A.",
        cnpj: "23.456.789/0001-01",
        description: "Especializada em energia renovável, desenvolvendo projetos de energia solar e eólica em todo o Brasil.",
    },
    Company {
        id: 3,
        name: "EcoTech Industries",
        legal_name: "EcoTech Indústrias Sustentáveis Ltda",
        cnpj: "34.567.890/0001-12",
        description: "Indústria comprometida com eficiência energética e práticas sustentáveis na produção.",
    },
    Company {
        id: 4,
        name: "Sustentabilidade Plus",
        legal_name: "Sustentabilidade Plus Consultoria Ltda",
        cnpj: "45.678.901/0001-23",
        description: "Consultoria especializada em gestão de resíduos e implementação de práticas sustentáveis.",
    },
    Company {
        id: 5,
        name: "EcoConsult",
        legal_name: "EcoConsult Assessoria Ambiental S.A.",
        cnpj: "56.789.012/0001-34",
        description: "Assessoria ambiental com foco em sustentabilidade corporativa e certificações verdes.",
    },
];

/// Certificates of the signed-in user.
pub static CERTIFICATES: [Certificate; 3] = [
    Certificate {
        id: 1,
        course_name: "Gestão de Parques Eólicos",
        issued_on: "2024-01-15",
        validation_code: "CERT-2024-001-EL",
    },
    Certificate {
        id: 2,
        course_name: "Eficiência Energética Industrial",
        issued_on: "2024-02-20",
        validation_code: "CERT-2024-002-EE",
    },
    Certificate {
        id: 3,
        course_name: "Introdução à Energia Solar",
        issued_on: "2024-03-10",
        validation_code: "CERT-2024-003-SO",
    },
];

/// Format whole reais as `R$ 1.234.567`.
#[must_use]
pub fn format_brl(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("R$ {grouped}")
}

/// The three static lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    /// [`JOBS`]
    Jobs,
    /// [`COMPANIES`]
    Companies,
    /// [`CERTIFICATES`]
    Certificates,
}

/// Load state of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<T: 'static> {
    /// Screen never opened.
    NotLoaded,
    /// Waiting for the simulated load to finish.
    Loading,
    /// Items available.
    Loaded(&'static [T]),
}

impl<T: 'static> Default for Listing<T> {
    fn default() -> Self {
        Self::NotLoaded
    }
}

impl<T: 'static> Listing<T> {
    /// Whether the load is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded items, empty otherwise.
    #[must_use]
    pub const fn items(&self) -> &'static [T] {
        match self {
            Self::Loaded(items) => *items,
            Self::NotLoaded | Self::Loading => &[],
        }
    }
}

/// One-shot confirmations of catalog actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogNotice {
    /// A job application was sent.
    ApplicationSent,
    /// A certificate was downloaded.
    CertificateDownloaded,
}

impl CatalogNotice {
    /// Message text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ApplicationSent => "Candidatura enviada com sucesso!",
            Self::CertificateDownloaded => "Certificado baixado com sucesso!",
        }
    }
}

/// Catalog state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    /// Job openings.
    pub jobs: Listing<Job>,
    /// Partner companies.
    pub companies: Listing<Company>,
    /// Certificates.
    pub certificates: Listing<Certificate>,
    /// Pending confirmation, until shown.
    pub notice: Option<CatalogNotice>,
    /// Bumped by [`CatalogState::discard`]; completions of older loads are dropped.
    pub generation: u64,
}

impl CatalogState {
    /// Forget every list and notice, including loads still running.
    pub fn discard(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }

    fn is_loading(&self, kind: CatalogKind) -> bool {
        match kind {
            CatalogKind::Jobs => self.jobs.is_loading(),
            CatalogKind::Companies => self.companies.is_loading(),
            CatalogKind::Certificates => self.certificates.is_loading(),
        }
    }

    fn set_loading(&mut self, kind: CatalogKind) {
        match kind {
            CatalogKind::Jobs => self.jobs = Listing::Loading,
            CatalogKind::Companies => self.companies = Listing::Loading,
            CatalogKind::Certificates => self.certificates = Listing::Loading,
        }
    }

    fn set_loaded(&mut self, kind: CatalogKind) {
        match kind {
            CatalogKind::Jobs => self.jobs = Listing::Loaded(&JOBS),
            CatalogKind::Companies => self.companies = Listing::Loaded(&COMPANIES),
            CatalogKind::Certificates => self.certificates = Listing::Loaded(&CERTIFICATES),
        }
    }
}

/// Catalog actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    /// Start loading a list. Ignored while that list is loading.
    Load(CatalogKind),
    /// The simulated load finished.
    Loaded {
        /// List that finished.
        kind: CatalogKind,
        /// Generation the load was started in.
        generation: u64,
    },
    /// The user confirmed an application.
    ApplyToJob {
        /// Job id.
        job_id: u32,
    },
    /// The user confirmed a download.
    DownloadCertificate {
        /// Certificate id.
        certificate_id: u32,
    },
    /// The pending notice was shown.
    NoticeShown,
}

/// Catalog dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEnvironment {
    /// Simulated load time.
    pub delay: Duration,
}

impl CatalogEnvironment {
    /// Environment with the given load time.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

/// Catalog reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CatalogAction::Load(kind) => {
                if state.is_loading(kind) {
                    return smallvec![Effect::None];
                }
                tracing::debug!(?kind, "Loading catalog list");
                state.set_loading(kind);
                smallvec![Effect::Delay {
                    duration: env.delay,
                    action: Box::new(CatalogAction::Loaded {
                        kind,
                        generation: state.generation,
                    }),
                }]
            },

            CatalogAction::Loaded { kind, generation } => {
                if generation != state.generation || !state.is_loading(kind) {
                    tracing::debug!(?kind, generation, "Stale catalog completion dropped");
                    return smallvec![Effect::None];
                }
                state.set_loaded(kind);
                smallvec![Effect::None]
            },

            CatalogAction::ApplyToJob { job_id } => {
                match JOBS.iter().find(|job| job.id == job_id) {
                    Some(job) => {
                        tracing::info!(job_id, title = job.title, "Job application sent");
                        state.notice = Some(CatalogNotice::ApplicationSent);
                    },
                    None => tracing::warn!(job_id, "Application to unknown job ignored"),
                }
                smallvec![Effect::None]
            },

            CatalogAction::DownloadCertificate { certificate_id } => {
                if CERTIFICATES.iter().any(|c| c.id == certificate_id) {
                    tracing::info!(certificate_id, "Certificate downloaded");
                    state.notice = Some(CatalogNotice::CertificateDownloaded);
                } else {
                    tracing::warn!(certificate_id, "Download of unknown certificate ignored");
                }
                smallvec![Effect::None]
            },

            CatalogAction::NoticeShown => {
                state.notice = None;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolesson_testing::{assertions, ReducerTest};

    const DELAY: Duration = Duration::from_millis(500);

    fn test(state: CatalogState) -> ReducerTest<CatalogReducer, CatalogState, CatalogAction, CatalogEnvironment> {
        ReducerTest::new(CatalogReducer)
            .with_env(CatalogEnvironment::new(DELAY))
            .given_state(state)
    }

    #[test]
    fn test_load_schedules_delayed_completion() {
        test(CatalogState::default())
            .when_action(CatalogAction::Load(CatalogKind::Jobs))
            .then_state(|state| assert!(state.jobs.is_loading()))
            .then_effects(|effects| {
                let action = assertions::assert_delay(effects, DELAY);
                assert_eq!(
                    *action,
                    CatalogAction::Loaded {
                        kind: CatalogKind::Jobs,
                        generation: 0,
                    }
                );
            })
            .run();
    }

    #[test]
    fn test_load_ignored_while_loading() {
        test(CatalogState::default())
            .when_action(CatalogAction::Load(CatalogKind::Companies))
            .when_action(CatalogAction::Load(CatalogKind::Companies))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_loaded_exposes_static_tables() {
        test(CatalogState::default())
            .when_action(CatalogAction::Load(CatalogKind::Certificates))
            .when_action(CatalogAction::Loaded {
                kind: CatalogKind::Certificates,
                generation: 0,
            })
            .then_state(|state| {
                assert_eq!(state.certificates.items().len(), 3);
                assert!(state.jobs.items().is_empty());
            })
            .run();
    }

    #[test]
    fn test_completion_from_before_discard_is_dropped() {
        let mut state = CatalogState::default();
        state.set_loading(CatalogKind::Jobs);
        state.discard();

        test(state)
            .when_action(CatalogAction::Load(CatalogKind::Jobs))
            .when_action(CatalogAction::Loaded {
                kind: CatalogKind::Jobs,
                generation: 0,
            })
            .then_state(|state| {
                assert_eq!(state.generation, 1);
                assert!(state.jobs.is_loading());
            })
            .run();
    }

    #[test]
    fn test_completion_for_idle_list_is_dropped() {
        test(CatalogState::default())
            .when_action(CatalogAction::Loaded {
                kind: CatalogKind::Companies,
                generation: 0,
            })
            .then_state(|state| assert_eq!(state.companies, Listing::NotLoaded))
            .run();
    }

    #[test]
    fn test_reload_after_loaded() {
        test(CatalogState {
            jobs: Listing::Loaded(&JOBS),
            ..CatalogState::default()
        })
        .when_action(CatalogAction::Load(CatalogKind::Jobs))
        .then_state(|state| assert!(state.jobs.is_loading()))
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
    }

    #[test]
    fn test_apply_and_download_set_notices() {
        test(CatalogState::default())
            .when_action(CatalogAction::ApplyToJob { job_id: 3 })
            .then_state(|state| assert_eq!(state.notice, Some(CatalogNotice::ApplicationSent)))
            .run();

        test(CatalogState::default())
            .when_action(CatalogAction::DownloadCertificate { certificate_id: 2 })
            .then_state(|state| {
                assert_eq!(state.notice, Some(CatalogNotice::CertificateDownloaded));
                assert_eq!(state.notice.map(CatalogNotice::message), Some("Certificado baixado com sucesso!"));
            })
            .run();
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        test(CatalogState::default())
            .when_action(CatalogAction::ApplyToJob { job_id: 99 })
            .when_action(CatalogAction::DownloadCertificate { certificate_id: 99 })
            .then_state(|state| assert!(state.notice.is_none()))
            .run();
    }

    #[test]
    fn test_notice_shown_once() {
        test(CatalogState::default())
            .when_action(CatalogAction::ApplyToJob { job_id: 1 })
            .when_action(CatalogAction::NoticeShown)
            .then_state(|state| assert!(state.notice.is_none()))
            .run();
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0), "R$ 0");
        assert_eq!(format_brl(999), "R$ 999");
        assert_eq!(format_brl(2400), "R$ 2.400");
        assert_eq!(format_brl(35_000), "R$ 35.000");
        assert_eq!(format_brl(1_234_567), "R$ 1.234.567");
        assert_eq!(JOBS[0].salary_label(), "R$ 3.500");
    }

    #[test]
    fn test_certificate_date_label() {
        assert_eq!(CERTIFICATES[0].issued_on_label(), "15/01/2024");
        let odd = Certificate {
            issued_on: "em breve",
            ..CERTIFICATES[0]
        };
        assert_eq!(odd.issued_on_label(), "em breve");
    }

    #[test]
    fn test_every_job_company_is_a_partner() {
        for job in &JOBS {
            assert!(COMPANIES.iter().any(|c| c.name == job.company), "{}", job.company);
        }
    }
}
