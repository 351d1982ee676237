//! Parsing decrypted message documents into typed variants

use wecom_common::LoggingTransformer;
use wecom_message::xml::flatten;
use wecom_message::{InboundEnvelope, MessageError, MessageKind, MessageParser};

fn document(msg_type: &str, body: &str) -> Vec<u8> {
    format!(
        "<xml>\
           <ToUserName><![CDATA[wx1]]></ToUserName>\
           <FromUserName><![CDATA[zhangsan]]></FromUserName>\
           <CreateTime>1409659813</CreateTime>\
           <MsgType><![CDATA[{msg_type}]]></MsgType>\
           {body}\
           <AgentID>7</AgentID>\
         </xml>"
    )
    .into_bytes()
}

#[test]
fn test_text_message() {
    LoggingTransformer::init_test();
    let xml = document(
        "text",
        "<Content><![CDATA[hello]]></Content><MsgId>4561255354251345929</MsgId>",
    );
    let message = MessageParser::parse(&xml).expect("text parses");

    assert_eq!(message.from_id, "zhangsan");
    assert_eq!(message.to_id, "wx1");
    assert_eq!(message.create_time, 1_409_659_813);
    assert_eq!(message.type_tag, "text");
    assert_eq!(message.msg_id, Some(4_561_255_354_251_345_929));
    assert_eq!(message.agent_id.as_deref(), Some("7"));
    assert_eq!(message.content(), Some("hello"));
    assert_eq!(message.raw_bytes(), xml.as_slice());
}

#[test]
fn test_plain_text_and_indentation() {
    let xml = b"<xml>\n  <ToUserName>wx1</ToUserName>\n  <FromUserName>u</FromUserName>\n  \
                <CreateTime>1</CreateTime>\n  <MsgType>text</MsgType>\n  \
                <Content>a &amp; b</Content>\n</xml>";
    let message = MessageParser::parse(xml).expect("indented document parses");
    assert_eq!(message.content(), Some("a & b"));
}

#[test]
fn test_media_messages() {
    let image = MessageParser::parse(&document(
        "image",
        "<PicUrl><![CDATA[http://p/1.jpg]]></PicUrl><MediaId><![CDATA[m1]]></MediaId>",
    ))
    .expect("image parses");
    match &image.kind {
        MessageKind::Image(body) => {
            assert_eq!(body.pic_url, "http://p/1.jpg");
            assert_eq!(body.media_id, "m1");
        }
        other => panic!("expected image, got {other:?}"),
    }

    let voice = MessageParser::parse(&document(
        "voice",
        "<MediaId>m2</MediaId><Format>amr</Format>",
    ))
    .expect("voice parses");
    match &voice.kind {
        MessageKind::Voice(body) => {
            assert_eq!(body.format, "amr");
            assert_eq!(body.recognition, None);
        }
        other => panic!("expected voice, got {other:?}"),
    }
    assert_eq!(voice.media_id(), Some("m2"));

    let short = MessageParser::parse(&document(
        "shortvideo",
        "<MediaId>m3</MediaId><ThumbMediaId>t3</ThumbMediaId>",
    ))
    .expect("short video parses");
    assert_eq!(short.type_tag, "shortvideo");
    match &short.kind {
        MessageKind::Video(body) => assert_eq!(body.thumb_media_id, "t3"),
        other => panic!("expected video, got {other:?}"),
    }
}

#[test]
fn test_location_and_link() {
    let location = MessageParser::parse(&document(
        "location",
        "<Location_X>23.134521</Location_X><Location_Y>113.358803</Location_Y>\
         <Scale>20</Scale><Label><![CDATA[Somewhere]]></Label>",
    ))
    .expect("location parses");
    match &location.kind {
        MessageKind::Location(body) => {
            assert!((body.latitude - 23.134_521).abs() < f64::EPSILON);
            assert!((body.longitude - 113.358_803).abs() < f64::EPSILON);
            assert_eq!(body.scale, 20);
            assert_eq!(body.label, "Somewhere");
        }
        other => panic!("expected location, got {other:?}"),
    }

    let link = MessageParser::parse(&document(
        "link",
        "<Title>t</Title><Description>d</Description><Url>http://u</Url><PicUrl>http://p</PicUrl>",
    ))
    .expect("link parses");
    match &link.kind {
        MessageKind::Link(body) => {
            assert_eq!(body.title, "t");
            assert_eq!(body.url, "http://u");
        }
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn test_events() {
    let click = MessageParser::parse(&document(
        "event",
        "<Event><![CDATA[CLICK]]></Event><EventKey><![CDATA[menu_1]]></EventKey>",
    ))
    .expect("click event parses");
    assert_eq!(click.msg_id, None);
    match &click.kind {
        MessageKind::Event(body) => {
            assert_eq!(body.event, "click");
            assert_eq!(body.event_key.as_deref(), Some("menu_1"));
            assert_eq!(body.latitude, None);
        }
        other => panic!("expected event, got {other:?}"),
    }

    let report = MessageParser::parse(&document(
        "event",
        "<Event>LOCATION</Event><Latitude>23.104</Latitude>\
         <Longitude>113.320</Longitude><Precision>65.000</Precision>",
    ))
    .expect("location event parses");
    match &report.kind {
        MessageKind::Event(body) => {
            assert_eq!(body.event, "location");
            assert_eq!(body.latitude, Some(23.104));
            assert_eq!(body.precision, Some(65.0));
        }
        other => panic!("expected event, got {other:?}"),
    }
}

#[test]
fn test_unknown_type_keeps_common_fields() {
    let message = MessageParser::parse(&document("holiday", "<Foo>bar</Foo>"))
        .expect("unknown type still parses");
    assert!(message.is_unknown());
    assert_eq!(message.type_tag, "holiday");
    assert_eq!(message.from_id, "zhangsan");
    assert!(!MessageParser::is_registered("holiday"));
    assert!(MessageParser::is_registered("TEXT"));
}

#[test]
fn test_type_tag_is_lowercased() {
    let message =
        MessageParser::parse(&document("Text", "<Content>x</Content>")).expect("parses");
    assert_eq!(message.type_tag, "text");
    assert_eq!(message.content(), Some("x"));
}

#[test]
fn test_missing_msg_type() {
    let err = MessageParser::parse(b"<xml><FromUserName>u</FromUserName></xml>").unwrap_err();
    assert!(matches!(err, MessageError::Parse(_)));
}

#[test]
fn test_malformed_documents() {
    for xml in [
        &b""[..],
        b"<xml><MsgType>text</MsgType>",
        b"<xml><MsgType>text</Other></xml>",
        b"<a/><b/>",
        b"<xml>loose<MsgType>text</MsgType></xml>",
    ] {
        let err = MessageParser::parse(xml).unwrap_err();
        assert!(
            matches!(err, MessageError::Parse(_)),
            "expected parse error for {:?}",
            String::from_utf8_lossy(xml)
        );
    }
}

#[test]
fn test_unparsable_number() {
    let err = MessageParser::parse(&document(
        "location",
        "<Location_X>north</Location_X>",
    ))
    .unwrap_err();
    assert!(matches!(err, MessageError::Parse(_)));
}

#[test]
fn test_inbound_envelope() {
    let envelope = InboundEnvelope::parse(
        b"<xml><ToUserName><![CDATA[wx1]]></ToUserName>\
          <Encrypt><![CDATA[AAAA]]></Encrypt><AgentID><![CDATA[7]]></AgentID></xml>",
    )
    .expect("envelope parses");
    assert_eq!(envelope.encrypt, "AAAA");
    assert_eq!(envelope.to_user_name.as_deref(), Some("wx1"));
    assert_eq!(envelope.agent_id.as_deref(), Some("7"));

    for body in [
        &b"<xml><ToUserName>wx1</ToUserName></xml>"[..],
        b"<xml><Encrypt></Encrypt></xml>",
        b"\xff\xfe<xml/>",
    ] {
        assert!(matches!(
            InboundEnvelope::parse(body),
            Err(MessageError::Parse(_))
        ));
    }
}

#[test]
fn test_whitespace_only_content_is_kept() {
    let message = MessageParser::parse(&document("text", "<Content>   </Content>"))
        .expect("whitespace content parses");
    assert_eq!(message.content(), Some("   "));

    let message = MessageParser::parse(&document("text", "<Content><![CDATA[ \n ]]></Content>"))
        .expect("whitespace CDATA parses");
    assert_eq!(message.content(), Some(" \n "));
}

#[test]
fn test_repeated_field_is_rejected() {
    let err = MessageParser::parse(&document(
        "text",
        "<MsgType><![CDATA[text]]></MsgType><Content>x</Content>",
    ))
    .unwrap_err();
    assert!(matches!(err, MessageError::Parse(_)));

    let err = MessageParser::parse(&document(
        "text",
        "<Content>a</Content><Content>b</Content>",
    ))
    .unwrap_err();
    assert!(matches!(err, MessageError::Parse(_)));
}

#[test]
fn test_nested_fields_do_not_collide_with_top_level() {
    let message = MessageParser::parse(&document(
        "link",
        "<Title>outer</Title><Extra><Title>inner</Title></Extra><Url>http://u</Url>",
    ))
    .expect("nested elements parse");
    match &message.kind {
        MessageKind::Link(body) => assert_eq!(body.title, "outer"),
        other => panic!("expected link, got {other:?}"),
    }

    let fields = flatten(&document(
        "link",
        "<Title>outer</Title><Extra><Title>inner</Title></Extra>",
    ))
    .expect("well formed");
    assert_eq!(fields.get("Title"), Some("outer"));
    assert_eq!(fields.get("Extra/Title"), Some("inner"));
}

#[test]
fn test_repeated_nested_items_are_listed() {
    let fields = flatten(
        b"<xml><ArticleCount>2</ArticleCount><Articles>\n  \
          <item><Title>a</Title></item>\n  \
          <item><Title>b</Title></item>\n</Articles></xml>",
    )
    .expect("list items may repeat");
    assert_eq!(fields.get_all("Articles/item/Title"), ["a", "b"]);
    assert_eq!(fields.get("Articles"), Some(""));
    assert!(fields.get_all("Articles/item/Url").is_empty());
}

#[test]
fn test_character_data_under_root_is_rejected() {
    for xml in [
        &b"<xml><![CDATA[loose]]><MsgType>text</MsgType></xml>"[..],
        b"<xml>loose<MsgType>text</MsgType></xml>",
        b"<xml><Outer>mixed<MsgType>text</MsgType></Outer></xml>",
    ] {
        assert!(matches!(flatten(xml), Err(MessageError::Parse(_))));
    }
    assert!(flatten(b"<xml><![CDATA[ ]]><MsgType>text</MsgType></xml>").is_ok());
}
