//! Template engine for the generated text assets.

use minijinja::{context, Environment};

const PLACEHOLDER: &str = "placeholder.txt";
const CONFIG_STUB: &str = "config_stub.txt";
const DOWNLOAD_PAGE: &str = "download.html";

/// Source text of the three generated assets.
///
/// Each field is a minijinja template rendered against a [`PageContext`].
/// The defaults are the production texts; callers may swap any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    /// Written in place of the artifact when the download fails
    pub placeholder: String,
    /// Hosting SDK configuration with credential placeholders
    pub config_stub: String,
    /// HTML page linking the artifact
    pub download_page: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            config_stub: DEFAULT_CONFIG_STUB.to_string(),
            download_page: DEFAULT_DOWNLOAD_PAGE.to_string(),
        }
    }
}

/// Values available to every template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Site title
    pub title: String,
    /// File name of the artifact, relative to the output directory
    pub artifact_name: String,
    /// Where users can get the app when the artifact is a placeholder
    pub fallback_url: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine from a template set.
    pub fn new(templates: &TemplateSet) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        env.add_template_owned(PLACEHOLDER, templates.placeholder.clone())?;
        env.add_template_owned(CONFIG_STUB, templates.config_stub.clone())?;
        env.add_template_owned(DOWNLOAD_PAGE, templates.download_page.clone())?;

        Ok(Self { env })
    }

    /// Render the placeholder text.
    pub fn render_placeholder(&self, ctx: &PageContext) -> Result<String, minijinja::Error> {
        self.render(PLACEHOLDER, ctx)
    }

    /// Render the configuration stub.
    pub fn render_config_stub(&self, ctx: &PageContext) -> Result<String, minijinja::Error> {
        self.render(CONFIG_STUB, ctx)
    }

    /// Render the download page.
    pub fn render_download_page(&self, ctx: &PageContext) -> Result<String, minijinja::Error> {
        self.render(DOWNLOAD_PAGE, ctx)
    }

    fn render(&self, name: &str, ctx: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(name)?;

        tmpl.render(context! {
            title => &ctx.title,
            artifact_name => &ctx.artifact_name,
            fallback_url => &ctx.fallback_url,
        })
    }
}

const DEFAULT_PLACEHOLDER: &str = "Este é um arquivo de espaço reservado para o APK. O aplicativo real pode ser baixado em {{ fallback_url }}";

const DEFAULT_CONFIG_STUB: &str = r#"// Configuração do Firebase
const firebaseConfig = {
    apiKey: "YOUR_API_KEY",
    authDomain: "YOUR_PROJECT_ID.firebaseapp.com",
    projectId: "YOUR_PROJECT_ID",
    storageBucket: "YOUR_PROJECT_ID.appspot.com",
    messagingSenderId: "YOUR_SENDER_ID",
    appId: "YOUR_APP_ID"
};

// Inicializar Firebase
firebase.initializeApp(firebaseConfig);
"#;

const DEFAULT_DOWNLOAD_PAGE: &str = r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Download - {{ title }}</title>
    <link rel="icon" href="favicon.ico">
    <style>
        body {
            font-family: 'Roboto', sans-serif;
            margin: 0;
            padding: 0;
            background-color: #0B0B0F;
            color: #FAFAFA;
            line-height: 1.6;
            text-align: center;
        }

        .container {
            max-width: 800px;
            margin: 0 auto;
            padding: 2rem;
        }

        .title {
            font-size: 2.5rem;
            margin-bottom: 0.5rem;
            background: linear-gradient(90deg, #6BCB77, #4D96FF);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            font-weight: 700;
        }

        .button {
            background: linear-gradient(45deg, #6BCB77, #4D96FF);
            color: white;
            border: none;
            padding: 0.8rem 2rem;
            font-size: 1rem;
            border-radius: 8px;
            cursor: pointer;
            font-weight: 600;
            transition: transform 0.3s, box-shadow 0.3s;
            display: inline-block;
            text-decoration: none;
            box-shadow: 0 4px 15px rgba(109, 203, 119, 0.15);
            margin: 2rem 0.5rem;
        }

        .button:hover {
            transform: translateY(-3px);
            box-shadow: 0 7px 20px rgba(109, 203, 119, 0.25);
        }

        .card {
            background-color: #1C1C2A;
            border-radius: 12px;
            border: 1px solid #33334B;
            padding: 2rem;
            margin: 2rem auto;
            max-width: 600px;
            box-shadow: 0 8px 20px rgba(0, 0, 0, 0.15);
        }
    </style>
</head>
<body>
    <div class="container">
        <h1 class="title">{{ title }}</h1>
        <p>Download do Aplicativo Android</p>

        <div class="card">
            <h2>Aplicativo Android</h2>
            <p>Acesse o sistema completo diretamente do seu dispositivo Android, com todas as funcionalidades disponíveis mesmo em áreas com conexão limitada.</p>
            <a href="{{ artifact_name }}" class="button" download>Baixar APK</a>
            <a href="index.html" class="button">Voltar</a>
        </div>

        <div class="card">
            <h2>Instruções de Instalação</h2>
            <ol style="text-align: left;">
                <li>Baixe o arquivo APK</li>
                <li>No seu dispositivo Android, vá para Configurações > Segurança</li>
                <li>Ative a opção "Fontes desconhecidas" para permitir a instalação</li>
                <li>Abra o arquivo APK baixado para instalar</li>
                <li>Após a instalação, o aplicativo estará disponível no seu menu de aplicativos</li>
            </ol>
        </div>
    </div>
</body>
</html>"##;
