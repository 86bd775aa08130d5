use serde_json::{json, Value};

use crate::config::ADMIN_EMAIL;

use super::entity::Entity;
use super::{Record, Store, StoreError};

/// Idempotent startup seeding: a bootstrap admin account keyed by email, and
/// demo catalog content inserted only when the collection is still empty so
/// operator edits and deletions survive restarts.
pub async fn ensure_seeded(store: &dyn Store, admin_password: &str) -> Result<(), StoreError> {
    ensure_admin(store, admin_password).await?;

    seed_if_empty(store, Entity::Psychologists, psychologists()).await?;
    seed_if_empty(store, Entity::Packages, packages()).await?;
    seed_if_empty(store, Entity::Tests, tests()).await?;
    seed_if_empty(store, Entity::BlogPosts, blog_posts()).await?;
    seed_if_empty(store, Entity::NewsItems, news_items()).await?;
    seed_if_empty(store, Entity::Videos, videos()).await?;
    seed_if_empty(store, Entity::Events, events()).await?;
    seed_if_empty(store, Entity::SupportOrgs, support_orgs()).await?;

    Ok(())
}

async fn ensure_admin(store: &dyn Store, password: &str) -> Result<(), StoreError> {
    let existing = store
        .find_by(Entity::Users, "email", &Value::String(ADMIN_EMAIL.into()))
        .await?;
    if existing.is_some() {
        return Ok(());
    }
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|err| StoreError::Unavailable(format!("password hashing failed: {err}")))?;
    let admin = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "name": "Administrador",
        "email": ADMIN_EMAIL,
        "password_hash": hash,
        "is_admin": true,
    });
    store
        .insert(Entity::Users, to_record(admin))
        .await?;
    tracing::info!("seeded bootstrap admin account ({ADMIN_EMAIL})");
    Ok(())
}

async fn seed_if_empty(
    store: &dyn Store,
    entity: Entity,
    rows: Vec<Value>,
) -> Result<(), StoreError> {
    if store.count(entity).await? > 0 {
        return Ok(());
    }
    let total = rows.len();
    for row in rows {
        store.insert(entity, to_record(row)).await?;
    }
    tracing::info!("seeded {} rows into {}", total, entity.table());
    Ok(())
}

fn to_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

fn psychologists() -> Vec<Value> {
    vec![
        json!({
            "id": "psy-1",
            "name": "Dra. Elena Silva",
            "title": "Psicóloga Clínica",
            "price_cents": 1700,
            "rating": 4.9,
            "bio": "Especialista em ansiedade e adaptação cultural.",
            "tags": ["Ansiedade", "Adaptação"],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuCa6bp0vFHcHwn1shKRuQ1SXkZ7RN1lU37jAScKrDiaLII3OjC0NQM8Kgqwz-XP3ZHUNE80Rs5GgVymsGpScmAPnpF18kVAtDTo9QREaNym_SDXlFcQWqlzOttOTY318tP09JDmT68KWook4jB0LmD7jlU79g5QEb6OewyUIDn1Nmji-_0imb7PCcp43juajim6LA6vsQX3H1oGn5e2kjroaUw7KN8gKHBo16ZTYnYGsm8h53uo5VAUHsyPt2Dr1YY_pYdwhUayYEQ",
        }),
        json!({
            "id": "psy-2",
            "name": "Dr. Carlos Mendes",
            "title": "Psicoterapeuta",
            "price_cents": 2000,
            "rating": 5.0,
            "bio": "Foco em depressão e luto migratório.",
            "tags": ["Depressão", "Luto"],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuCoLX-a_Xn3Pvh0QKZFPv1Bbq8PaaNsQPmE1IauaZGZjLva2jutjuJsNJnX868C1yhunHI19wJCWSTBCw9_jzEbKu8eV6gDnbjyYCw8weaavpokXfiQRATyShKo1u84RI9yMzzzQVW7kp4-Udx_CyCeCLMZn-LafU2DMkiKU0-OyhM11wgnyUZ41IZg2n1TKb5o-pFRu6Ein0mi91kHe9_JbV6nE6oQqgTMZ7fN6e0RTeAHWkvgYVnW77KjLs_jJ2LGPXywYOigYQc",
        }),
        json!({
            "id": "psy-3",
            "name": "Dr. Miguel Sousa",
            "title": "Psicólogo",
            "price_cents": 1700,
            "rating": 4.8,
            "bio": "Especialista em carreira e ansiedade.",
            "tags": ["Carreira", "Ansiedade"],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuCLEtqNAZ4ZFn-gbb6GqGvtLv_go27u0oS4kbJqNEOd-SQEFqBf6BXUMVqyxTWOv_twKAAo6Z3SCir522WIbvUAdAT-FKG9PhyF-apSvPuE6BaD2twYXhWUudPyVxqLBdAQ59TbUepCZ9XbsbqkOi7QxpYK3MF-45f7oLAEKt_wCG76UlhPlTGCdwibDiDndcoObqoRZOtDbPhq714TDeJ6afkLRBtn4ZNFIJEzo9X0PHP6fNWq-DqGtIGtnICIVemyIlAZ5SIfl9A",
        }),
    ]
}

fn packages() -> Vec<Value> {
    vec![
        json!({"code": "pkg-1", "sessions": 1, "price_cents": 1700, "discount_cents": 0}),
        json!({"code": "pkg-2", "sessions": 2, "price_cents": 3200, "discount_cents": 200}),
        json!({"code": "pkg-3", "sessions": 3, "price_cents": 4500, "discount_cents": 600}),
        json!({"code": "pkg-4", "sessions": 4, "price_cents": 5600, "discount_cents": 1200}),
    ]
}

fn tests() -> Vec<Value> {
    vec![
        json!({"id": "test-bai", "name": "Escala de Ansiedade de Beck (BAI)", "category": "Saúde Emocional", "duration_minutes": 5}),
        json!({"id": "test-bdi", "name": "Inventário de Depressão de Beck (BDI)", "category": "Saúde Emocional", "duration_minutes": 7}),
        json!({"id": "test-integracao", "name": "Nível de Integração Cultural", "category": "Integração", "duration_minutes": 6}),
        json!({"id": "test-conhecimento", "name": "Conhecimento sobre o País", "category": "Integração", "duration_minutes": 6}),
    ]
}

fn blog_posts() -> Vec<Value> {
    vec![
        json!({
            "id": "blog-1",
            "title": "Como Lidar com a Saudade de Casa",
            "category": "Saúde Mental",
            "summary": "Dicas práticas para manter sua saúde mental forte enquanto se adapta a um novo país.",
            "read_minutes": 5,
            "content": "Conteúdo completo do artigo.",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuB7HEkATmtmvg7QmtLIP8_VMCqJUb_edsD029rSn3rOfnC2YVh8cJ9h-GVOdgKE_TUKS4ePSQ2O3ROWAtl-_T57KogNBVFN226amRJqQHyHYgJTeKG64RMBtlatc0v-AEAOtn_PxtmTDBRmCLWviQkSkeaifT-16SrpijtZNekqA-xR2FcV44xI2B6ORJwOILm0H1jV7mymVPQ0SSIK5ACx7M3DAasSbTngWCOAHdx2sFDcRIRT5wLcq9NagHiG5b3Cmr7uzCP88pA",
        }),
        json!({
            "id": "blog-2",
            "title": "Guia para Validar seu Diploma",
            "category": "Integração",
            "summary": "Passo a passo simplificado para começar o processo de validação.",
            "read_minutes": 8,
            "content": "Conteúdo completo do artigo.",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuB0YhTJ7hRktbN2NYHiJG2f47NqSSuyk7iHNSH8AhCi6JjgqYNUnrPu1lgQdiAUyjvF0bmI8bXHuxWkjAswVB-PMLIiwKIGuisaeqRhhP_rDYQKxy5s440jX_8VLQ2aVsMDXGH3bjogFUb2bBs5TTHdoFthhlOaOlizDdL_Lkc7eUOHvw90_1QoeFcXBcH0HhVqNnIU16_s3H9MtWLgtYeIBet2LYDgLqMLSaUcR-rNB6PvRn6znMvlox089k2tQU8EQYB2t9Xbni0",
        }),
        json!({
            "id": "blog-3",
            "title": "Receitas Fáceis e Saudáveis",
            "category": "Bem-estar",
            "summary": "Ideias rápidas para manter uma alimentação equilibrada no dia a dia.",
            "read_minutes": 6,
            "content": "Conteúdo completo do artigo.",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuAX8N1IBk4kEaiRo-e55cWhEzl4n79YaBYpR-fTY0Mk7fdUNd248ZatZvaiH6CwS_ZoBmFMEX_xVu_ncFktzc9J-lfu_tRNEhAzK1YB9qFtdOv_cykclsDnxUaM-6dhlpwqGJXuv5tztp1mpilqdSEhTrpkI_CLS7xK5Uqosaf16FCecrDvkIKDALhldCT9Ln5-kEMOF5MAmvPj_s2EDW7oFqEdcVwt0-M0S1JqnoZbmJsRzAxcd5J8wEdJGA_r46-L2KJcrIDwQWQ",
        }),
    ]
}

fn news_items() -> Vec<Value> {
    vec![
        json!({
            "id": "news-1",
            "title": "Governo anuncia novas regras de visto para trabalhadores",
            "summary": "Entenda as mudanças que entram em vigor a partir do próximo mês e como elas podem impactar você.",
            "source": "Público",
            "url": "https://example.com",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDJR6Hev3ybr3gaN5HHX03rcNo8UIVk6KXu1qK8rG7H0uoSz9ZJrPoVoMbq4261w0ia84i4fQF94WB38GjdA4T0D8DgXrQW8qG4bEEoqJdr7Ce0URih7Ai0g3va7lHk6OoYEdElU8J1WUkailSIe7RuaQWX69ge5LE_BBxFvBmIdhnFDjFeQflMAIxXKRGOg9fJVkY7-JfD4Em13q7f5kuweDaMhf8r7IDTsx7aQetjdMIbZ1dpv4igAWG3qpfqSQM5tkXv3WyROIE",
        }),
        json!({
            "id": "news-2",
            "title": "Novos cursos de português gratuitos abrem inscrições",
            "summary": "Iniciativa visa facilitar a integração de recém-chegados e aprimorar a comunicação no dia a dia.",
            "source": "DN",
            "url": "https://example.com",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuCfI9rFc8-cvemZoTA1IihbkMkLM6qio0Rn6ztzMhXigtuUuzyZK22DqMgXTQ0eaGJ_0jkE4uS4sB-6cqLX0t9L2288huIPZS7z8hlhD4__xKDBhQyZGMFgOax5ar6DK0G9RA05eUnEev1yHI1Mpv_UzS_hP_etw7xYQMuVZqQ_seKrZqXCQBh4aDFlB8cObcCp-F-V5AJgksuGdml0FMAN7BAvb1DPB9PMWsgKimKfuDJbnsEXYL-K2mnlO2q3Apg30Djegu49sQ0",
        }),
        json!({
            "id": "news-3",
            "title": "Acesso à saúde: o que mudou para imigrantes em 2024",
            "summary": "Confira o guia atualizado sobre como aceder ao Serviço Nacional de Saúde e os seus direitos.",
            "source": "SNS",
            "url": "https://example.com",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuBkbTMMfzGySiPXYACsGXOvnHf4CAM4L-0MVWLV_SVIJ1mfWYqYA0z9ovt0kScoj7R8rKWBFTReZTRVT9CPz1hIbaPd3HpztEspSDZlbS1iHwQNaLDuE-94S42hx079PA6IDR3yOrG6Tr_AAzWXmV4XfWxCABpujfo27I95sYkQ2qpgv_Gt4639-Wl6Z8I6D5_ccSmv3TPHm7-ZxFI-s0WRY0vBv0DOLAyYQkmchAcByBGYzObJHVLEtj27n0F9Dy2DuZGkSM0wlSA",
        }),
    ]
}

fn videos() -> Vec<Value> {
    vec![
        json!({
            "id": "video-1",
            "title": "Como lidar com a ansiedade da mudança",
            "category": "Saúde Mental",
            "duration": "12:45",
            "channel": "Canal Tekóa",
            "url": "https://youtube.com",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuCKA0PakLTrNCQ9Yx59zs-3luAPgAu2EDpesKbZUQeN8LwazTEinTUg_E6vAp8gnw8PnnbZuXQzeHrIpswq69j-OF4v6ak6LrWGwHfGQr8DYQ5dsC8KFndwZpGYk1CIGqZ-Wh___woyyS0ytfNFxOa_eJnhO3swZylVj0aY7C0IuDyFGcWGNlQS-Flm2G9lt9KMYX01YDLtJpSz6ve8pRn3W4kTdRIGfQMR1-LME8uHToWHrUa5VLR1wMQXMwQefnwsLyW5UWjdK_U",
        }),
        json!({
            "id": "video-2",
            "title": "Passo a passo: Abrindo conta bancária em Portugal",
            "category": "Finanças",
            "duration": "08:30",
            "channel": "Finanças para Todos",
            "url": "https://youtube.com",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuAGUt4qbcz9S8TSQszQtvVnpsFCx6TJnhdZlOa6QwQA7RVsdCPOne3Ok2dmi6sZt1-8h3B4CKZ5--PS5_srCj5XgkYXDxYAtTE5TW_79Vg1e6mXgwXzqv7rwqM0o6Fm88xvq34b5GGCX-1kjsCraXJLr8H6xPTISweYBORTQofVCaUysIQ6-h7AIrHpcXgtTnms06lyNcLmQZKEBbOsu9aWPibnX4u1xi9oKwEgCmRcagZK0GjeChn2ySs4Ju0jcqCRMfRbIql8Nq0",
        }),
        json!({
            "id": "video-3",
            "title": "Roda de conversa: Experiências de imigração",
            "category": "Eventos",
            "duration": "45:00",
            "channel": "Tekóa Ao Vivo",
            "url": "https://youtube.com",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuCe15zH24REZFS1RnmDP64sLJcxoHqFqEyI_6i8Cwd_3P-mpjBZFkLEFMlgWaklwtYiEOiZFXjObLzoP_7tFJYmrN7jqD3yP2hCGBaPBYHux23uKs6sf2hvsCqsw9NdOAyjNqegqQPMatxb7gHx7z1zaFCqyPWYQO02H1_xysK6fgTdT2TcEkW3j-lMIyLV1f1-IdnEdY3yy8LvrvO7wGbOcLNgllNbwowfEyu-rpKB_unHax-bybGcW7uYPOl75uho_Oc26CE_UVY",
        }),
    ]
}

fn events() -> Vec<Value> {
    vec![
        json!({
            "id": "event-1",
            "title": "Cuidando da Ansiedade no Dia a Dia",
            "description": "Técnicas simples de respiração e mindfulness.",
            "category": "Próximos",
            "date_time": "2024-10-25T19:00:00Z",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDMkb4lsUv5sIp1IXB1uhDifkSUP0SOIxmw1VYG2pnoE0laIbuEj-Q3oDwSyZGxIkwNtImvDqfulNdd8R-LDNxbI1T3-gmPBC8DmYSGgtU16_jFZutw0CCvZ2EECect1NvtPl5SDRlluP7eXSFhiOJFBXFcpZkQg0xzqvREViVfXSdPSQFbwpIIbDRSeg71O8NQO2NX-sxF7Uc02_K86IO-ZdPhFJnMq5Nt8hzB29idBdeY3jur8pmNLm3tvf7XIU3vihTasmmrReM",
            "status": "upcoming",
            "is_recorded": false,
        }),
        json!({
            "id": "event-2",
            "title": "Comunicação e Conexão",
            "description": "Como criar laços em um novo país.",
            "category": "Próximos",
            "date_time": "2024-11-10T20:00:00Z",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuAU9lCq77iwp3bJJoX16CMWQoWcHZSUGqct_LeEof5O-xbzuxtWqomIhlIBW2gp0pUimBOSjHSA-9pgvWP6QW_8bEb7ZE-dIentDCamzWAtbPM0YHIuLY3ObTheCLEotUi3Gqgnpo0U29M5It3cJSpcPPj6Cbp3E4woF-T8Unz4suPxedUHgysA6bKvgY1W096f_V0WgseJ46aPKxNoCDukIKXeu6KjVECNBhE7MPsPIMSwV_nBD86UCkhED-MEx0uZHToJN3FKm2U",
            "status": "upcoming",
            "is_recorded": false,
        }),
        json!({
            "id": "event-3",
            "title": "Lidando com a Ansiedade da Adaptação",
            "description": "Tema: Saúde Mental",
            "category": "Anteriores",
            "date_time": "2024-08-25T19:00:00Z",
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDJR6Hev3ybr3gaN5HHX03rcNo8UIVk6KXu1qK8rG7H0uoSz9ZJrPoVoMbq4261w0ia84i4fQF94WB38GjdA4T0D8DgXrQW8qG4bEEoqJdr7Ce0URih7Ai0g3va7lHk6OoYEdElU8J1WUkailSIe7RuaQWX69ge5LE_BBxFvBmIdhnFDjFeQflMAIxXKRGOg9fJVkY7-JfD4Em13q7f5kuweDaMhf8r7IDTsx7aQetjdMIbZ1dpv4igAWG3qpfqSQM5tkXv3WyROIE",
            "status": "past",
            "is_recorded": true,
        }),
    ]
}

fn support_orgs() -> Vec<Value> {
    vec![
        json!({
            "id": "org-1",
            "name": "Alto Comissariado para as Migrações",
            "category": "Instituição Pública",
            "city": "Lisboa",
            "country": "Portugal",
            "description": "Instituição pública de apoio à integração.",
            "phone": "+351 111 111 111",
            "email": "contato@acm.pt",
            "website": "https://example.org",
            "tags": [],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDrA19d4PP2kNuZ9cX_R_rfxBhr3DZOFwonmqqKGsr4VjxIoru4tCLOi2UzRYcroN-MS9YHGtNFIxgip_x8VGhDtYJ94pCr-6XTiw7Z0cJABxJTS5X8w14KX7b-UG_3TtC4IEcvXzaZQJDGjA2VPghntx4PoxkAoliugWZzL0hYxWJCGfyRo8uSSSFr6_hXM4_D3Ge5ijzLuKiW-A3GgTGYaYp-As0A3fu5hA1jaN0oMUyPoyeboyMVMRhXcs7sKXjz_ksqwZYD32M",
        }),
        json!({
            "id": "org-2",
            "name": "Cruz Vermelha Portuguesa",
            "category": "ONG / Saúde",
            "city": "Porto",
            "country": "Portugal",
            "description": "Apoio humanitário e saúde.",
            "phone": "+351 222 222 222",
            "email": "contato@cvp.pt",
            "website": "https://example.org",
            "tags": [],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDuAgUfudVhI4vK1bhMAXhNMHxx7HLroOdBx7bu1LKFj-XpheHxRbqooCvvDR-bSqZ8kfChZkCZZMhj0Xcv-cOJUhvGZz8qOQ-qfT_6qwclNGgVRHpXtpGfabp6kswecr694NJXPVOWMcmcGIQyPs2w3hgyLiUnsibJpIXeCe4iL8ILMV85SLVLAD5dB36Fkgu53bdzpxazizWnCZWzYQKV-OZRf5GM4c9Y2cQSIkNcN5utWG1ACUriwga5q76ZP9N-jxAVAOmHJD0",
        }),
        json!({
            "id": "org-3",
            "name": "IEFP - Centro de Emprego",
            "category": "Emprego",
            "city": "Faro",
            "country": "Portugal",
            "description": "Serviços de emprego e formação.",
            "phone": "+351 333 333 333",
            "email": "contato@iefp.pt",
            "website": "https://example.org",
            "tags": [],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDqZ46SMT4Ygc-3bFte542edhCY8WP7JK6IZaMxL62_vlfFpWsaWVwsEVhfc6hlRyCepU3En_lf7Zyqo_8Lrw_KvzR8lDZEoqrNvwxMdOdGv-ydl3KT2L6lRcI9Tr8C7_u_N2odEU_mThbMvJfGPoeYhTA-IkQdMdZFEWp7teMzD3mP_C_2sCHt6mY7T6zHynHLBrS14za3VQuLdW1PD4d4bIGxMwaeOTfoK4qI1Mx11aTZV0IndmJ4dLEpSWnpMLX4hARp9Z3xUyk",
        }),
        json!({
            "id": "org-4",
            "name": "JRS - Serviço Jesuíta aos Refugiados",
            "category": "Apoio Social",
            "city": "Lisboa",
            "country": "Portugal",
            "description": "Apoio social e acolhimento.",
            "phone": "+351 444 444 444",
            "email": "contato@jrs.pt",
            "website": "https://example.org",
            "tags": [],
            "image_url": "https://lh3.googleusercontent.com/aida-public/AB6AXuDZgG_q2sUf_0eGS4k_UZas6Sn3cFkg6L_J9sB_LPdxWS8GPfywyVHfldvioSlC_zINHpXhYgy9IQr2Ux56vPUKxmn_iWEiyZkuL0x4VicnxStWMGXXVC1UzYp0t7tumvIav4dCIrDPbten3XRTFycO_c0p0VX1SgFcsdxyfGSS18UVl7o8vJf92Dw_GJYwes9Dbs6DYYQIHZLnXrWx8RDDRkFi5WZklx2DnJlNVraTi6nN78WBYQDSlRsNIsyNdVJLNCBBUwcGUqo",
        }),
    ]
}
